//! Analysis over a JSON HTTP service.
//!
//! Endpoints, all `POST` under the base URL:
//!
//! | path            | request                                   | response                      |
//! |-----------------|-------------------------------------------|-------------------------------|
//! | `/sentiment`    | `{text}`                                  | `{label, score}`              |
//! | `/entities`     | `{text}`                                  | `{entities: [Entity]}`        |
//! | `/topic`        | `{text, labels}`                          | `{label}`                     |
//! | `/subjectivity` | `{text}`                                  | `{label, score}`              |
//! | `/summarize`    | `{text, max_length, min_length}`          | `{summary}`                   |
//! | `/quotes`       | `{text, entities}`                        | `{quotes: [{text, person}]}`  |

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::utils::sanitize::truncate_for_log;

use super::{AnalysisEngine, Entity, Quote, Sentiment, Subjectivity};

#[derive(Debug, Clone)]
pub struct HttpAnalysisEngine {
    client: reqwest::Client,
    base_url: String,
    topic_labels: Vec<String>,
}

#[derive(Deserialize)]
struct EntitiesResponse {
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
struct TopicResponse {
    label: Option<String>,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
}

#[derive(Deserialize)]
struct QuotesResponse {
    quotes: Vec<Quote>,
}

impl HttpAnalysisEngine {
    pub fn new(client: reqwest::Client, base_url: &str, topic_labels: Vec<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            topic_labels,
        }
    }

    async fn call<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        resp.json()
            .await
            .with_context(|| format!("malformed response from {url}"))
    }

    /// Runs `call` and logs failures, keyed by the analyzed text.
    async fn best_effort<B, R>(&self, path: &str, body: &B, text: &str) -> Option<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned + Send,
    {
        match self.call(path, body).await {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(
                    "Analysis {} failed for '{}': {:#}",
                    path,
                    truncate_for_log(text, 50),
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl AnalysisEngine for HttpAnalysisEngine {
    async fn analyze_sentiment(&self, text: &str) -> Option<Sentiment> {
        if text.trim().is_empty() {
            return None;
        }
        self.best_effort("/sentiment", &json!({ "text": text }), text)
            .await
    }

    async fn extract_entities(&self, text: &str) -> Vec<Entity> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.best_effort::<_, EntitiesResponse>("/entities", &json!({ "text": text }), text)
            .await
            .map(|r| r.entities)
            .unwrap_or_default()
    }

    async fn classify_topic(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() || self.topic_labels.is_empty() {
            return None;
        }
        let body = json!({ "text": text, "labels": self.topic_labels });
        self.best_effort::<_, TopicResponse>("/topic", &body, text)
            .await
            .and_then(|r| r.label)
    }

    async fn analyze_subjectivity(&self, text: &str) -> Option<Subjectivity> {
        if text.trim().is_empty() {
            return None;
        }
        self.best_effort("/subjectivity", &json!({ "text": text }), text)
            .await
    }

    async fn summarize(&self, text: &str, max_len: usize, min_len: usize) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let body = json!({ "text": text, "max_length": max_len, "min_length": min_len });
        self.best_effort::<_, SummaryResponse>("/summarize", &body, text)
            .await
            .and_then(|r| r.summary)
            .filter(|s| !s.trim().is_empty())
    }

    async fn extract_quotes(&self, text: &str, entities: &[Entity]) -> Vec<Quote> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let body = json!({ "text": text, "entities": entities });
        self.best_effort::<_, QuotesResponse>("/quotes", &body, text)
            .await
            .map(|r| r.quotes)
            .unwrap_or_default()
    }
}
