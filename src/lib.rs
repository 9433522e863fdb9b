//! news_ingest library: headline ingestion pipeline
//!
//! This library collects candidate headlines from a configured set of news
//! sources, drops short and repeated ones, groups related headlines into
//! stories, enriches each headline through external NLP, geocoding and
//! text-extraction services, and stores every article exactly once per URL.
//!
//! # Example
//!
//! ```no_run
//! use news_ingest::{run_ingest, Config, SourceSelection};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     workers: 4,
//!     ..Default::default()
//! };
//!
//! let report = run_ingest(config, SourceSelection::Active).await?;
//! println!("Stored {} new articles from {} headlines",
//!          report.new_articles, report.headlines);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod analysis;
pub mod clustering;
pub mod config;
pub mod content;
pub mod dedup;
mod error_handling;
pub mod fetch;
pub mod geocode;
pub mod initialization;
pub mod models;
mod run;
pub mod sources;
pub mod storage;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    DatabaseError, ErrorType, InfoType, InitializationError, ProcessingStats, RunError,
    SourceConfigError, WarningType,
};
pub use run::{run_ingest, BatchReport, Capabilities, Pipeline, RunLock};
pub use sources::{SourceConfig, SourceRegistry, SourceSelection};
pub use utils::RetryPolicy;
