//! Database insert operations.
//!
//! Writers take a `&mut SqliteConnection` so each enrichment task can use the
//! connection it checked out of the pool. Every write runs in its own
//! transaction and uses parameterized queries.

mod article;
mod quotes;

pub use article::upsert_article;
pub use quotes::insert_quotes;
