use async_trait::async_trait;

use super::{AnalysisEngine, Entity, Quote, Sentiment, Subjectivity};

/// Used when no analysis service is configured; every signal is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnalysisEngine;

#[async_trait]
impl AnalysisEngine for DisabledAnalysisEngine {
    async fn analyze_sentiment(&self, _text: &str) -> Option<Sentiment> {
        None
    }

    async fn extract_entities(&self, _text: &str) -> Vec<Entity> {
        Vec::new()
    }

    async fn classify_topic(&self, _text: &str) -> Option<String> {
        None
    }

    async fn analyze_subjectivity(&self, _text: &str) -> Option<Subjectivity> {
        None
    }

    async fn summarize(&self, _text: &str, _max_len: usize, _min_len: usize) -> Option<String> {
        None
    }

    async fn extract_quotes(&self, _text: &str, _entities: &[Entity]) -> Vec<Quote> {
        Vec::new()
    }
}
