// storage/mod.rs
// Database operations module

mod insert;
mod migrations;
mod models;
mod pool;
mod query;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use insert::{insert_quotes, upsert_article};
pub use migrations::run_migrations;
pub use models::{ArticleFields, ArticleRecord, QuoteRecord, UpsertOutcome};
pub use pool::init_db_pool;
pub use query::{count_articles, find_article_by_url, quotes_for_article, recent_articles};
