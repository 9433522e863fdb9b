// storage/models.rs
// Database models and types

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::analysis::{Entity, Quote, Sentiment, Subjectivity};
use crate::error_handling::DatabaseError;
use crate::geocode::Coordinates;

/// Everything known about a headline when it is written.
///
/// Maps onto one row of the `articles` table. `entities` is stored as a JSON
/// array and `collected_at_ms` as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Default)]
pub struct ArticleFields {
    pub source: String,
    pub headline: String,
    pub url: String,
    pub collected_at_ms: i64,
    pub sentiment: Option<Sentiment>,
    pub entities: Vec<Entity>,
    pub topic: Option<String>,
    pub summary: Option<String>,
    pub full_text: Option<String>,
    pub subjectivity: Option<Subjectivity>,
    pub coordinates: Option<Coordinates>,
    pub story_id: Option<i64>,
}

/// Result of [`upsert_article`](super::upsert_article).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: i64,
    /// `true` only when this call created the row.
    pub is_new: bool,
}

/// A stored article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub id: i64,
    pub source: String,
    pub headline: String,
    pub url: String,
    pub collected_at_ms: i64,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub entities: Vec<Entity>,
    pub topic: Option<String>,
    pub summary: Option<String>,
    pub full_text: Option<String>,
    pub subjectivity_label: Option<String>,
    pub subjectivity_score: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub story_id: Option<i64>,
}

impl ArticleRecord {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, DatabaseError> {
        let entities: String = row.try_get("entities")?;
        Ok(Self {
            id: row.try_get("id")?,
            source: row.try_get("source")?,
            headline: row.try_get("headline")?,
            url: row.try_get("url")?,
            collected_at_ms: row.try_get("collected_at_ms")?,
            sentiment_label: row.try_get("sentiment_label")?,
            sentiment_score: row.try_get("sentiment_score")?,
            entities: serde_json::from_str(&entities)?,
            topic: row.try_get("topic")?,
            summary: row.try_get("summary")?,
            full_text: row.try_get("full_text")?,
            subjectivity_label: row.try_get("subjectivity_label")?,
            subjectivity_score: row.try_get("subjectivity_score")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            story_id: row.try_get("story_id")?,
        })
    }
}

/// A stored quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub id: i64,
    pub article_id: i64,
    pub quote_text: String,
    pub quoted_person: Option<String>,
}

impl QuoteRecord {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.try_get("id")?,
            article_id: row.try_get("article_id")?,
            quote_text: row.try_get("quote_text")?,
            quoted_person: row.try_get("quoted_person")?,
        })
    }
}

impl From<&QuoteRecord> for Quote {
    fn from(record: &QuoteRecord) -> Self {
        Quote {
            text: record.quote_text.clone(),
            person: record.quoted_person.clone().unwrap_or_default(),
        }
    }
}
