//! NLP analysis capability.
//!
//! Every method is best-effort: failures are logged by the implementation
//! and surface as `None` or an empty list, never as an error. Empty input
//! short-circuits the same way.

mod disabled;
mod http;
mod types;

use async_trait::async_trait;

pub use disabled::DisabledAnalysisEngine;
pub use http::HttpAnalysisEngine;
pub use types::{first_location, Entity, EntityLabel, Quote, Sentiment, Subjectivity};

#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    async fn analyze_sentiment(&self, text: &str) -> Option<Sentiment>;

    async fn extract_entities(&self, text: &str) -> Vec<Entity>;

    /// Best matching topic label.
    async fn classify_topic(&self, text: &str) -> Option<String>;

    async fn analyze_subjectivity(&self, text: &str) -> Option<Subjectivity>;

    /// Abstractive summary between `min_len` and `max_len` tokens.
    async fn summarize(&self, text: &str, max_len: usize, min_len: usize) -> Option<String>;

    /// Quotes in `text` attributed to one of the person `entities`.
    async fn extract_quotes(&self, text: &str, entities: &[Entity]) -> Vec<Quote>;
}
