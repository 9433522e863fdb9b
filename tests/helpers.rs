// Shared test helpers: fake capabilities, source pages and scratch databases.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use news_ingest::analysis::{AnalysisEngine, Entity, EntityLabel, Quote, Sentiment, Subjectivity};
use news_ingest::clustering::Embedder;
use news_ingest::content::ContentExtractor;
use news_ingest::fetch::{BrowserLauncher, BrowserSession, HeadlineFetcher};
use news_ingest::geocode::{CachingGeocoder, Coordinates, Geocoder};
use news_ingest::storage::{init_db_pool, run_migrations};
use news_ingest::{Capabilities, RetryPolicy, SourceConfig};

pub const ARTICLE_TEXT: &str = "Officials in Rosario said on Monday that the river had risen more than two metres overnight, forcing the evacuation of several neighbourhoods near the port. \"We will keep working until every family is safe,\" said Ana Pérez, head of civil defence.";

/// A page with one `<h2><a>` per headline.
pub fn headline_page(headlines: &[(&str, &str)]) -> String {
    let items: String = headlines
        .iter()
        .map(|(text, href)| format!("<h2><a href=\"{href}\">{text}</a></h2>\n"))
        .collect();
    format!("<html><body>\n<h1>Site</h1>\n{items}</body></html>")
}

/// Opens a file-backed database in `dir` with migrations applied.
pub async fn create_test_pool(dir: &Path) -> SqlitePool {
    let pool = init_db_pool(&dir.join("news.db"), 8)
        .await
        .expect("Failed to open test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Writes `sources` as a registry file in `dir`.
pub fn write_sources(dir: &Path, sources: &[SourceConfig]) -> PathBuf {
    let path = dir.join("sources.json");
    let json = serde_json::to_string_pretty(sources).expect("serialize sources");
    std::fs::write(&path, json).expect("write sources");
    path
}

/// A fetcher that retries without waiting.
pub fn fast_fetcher() -> HeadlineFetcher {
    let policy = RetryPolicy::new(3, Duration::ZERO, 2);
    HeadlineFetcher::new(reqwest::Client::new())
        .with_retry_policies(policy, policy)
        .with_browser_timings(Duration::ZERO, Duration::ZERO)
}

/// Analysis with fixed answers; every call to `extract_quotes` yields one quote.
#[derive(Default)]
pub struct FakeAnalysis {
    pub quote_calls: AtomicUsize,
}

#[async_trait]
impl AnalysisEngine for FakeAnalysis {
    async fn analyze_sentiment(&self, _text: &str) -> Option<Sentiment> {
        Some(Sentiment {
            label: "NEG".into(),
            score: 0.87,
        })
    }

    async fn extract_entities(&self, text: &str) -> Vec<Entity> {
        match text.find("Rosario") {
            Some(start) => vec![Entity {
                text: "Rosario".into(),
                label: EntityLabel::Location,
                start,
                end: start + "Rosario".len(),
            }],
            None => Vec::new(),
        }
    }

    async fn classify_topic(&self, _text: &str) -> Option<String> {
        Some("SOCIETY".into())
    }

    async fn analyze_subjectivity(&self, _text: &str) -> Option<Subjectivity> {
        Some(Subjectivity {
            label: "OBJECTIVE".into(),
            score: 0.7,
        })
    }

    async fn summarize(&self, text: &str, _max_len: usize, _min_len: usize) -> Option<String> {
        Some(text.chars().take(40).collect())
    }

    async fn extract_quotes(&self, _text: &str, _entities: &[Entity]) -> Vec<Quote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        vec![Quote {
            text: "We will keep working until every family is safe".into(),
            person: "Ana Pérez".into(),
        }]
    }
}

/// Returns [`ARTICLE_TEXT`] for every url, except urls containing `missing`
/// (no text) or `panic` (the task panics).
pub struct FakeContent;

#[async_trait]
impl ContentExtractor for FakeContent {
    async fn fetch_main_text(&self, url: &str) -> Option<String> {
        if url.contains("panic") {
            panic!("extractor blew up on {url}");
        }
        if url.contains("missing") {
            return None;
        }
        Some(ARTICLE_TEXT.to_string())
    }
}

#[derive(Default)]
pub struct FakeGeocoder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, _place: &str) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(Coordinates {
            latitude: -32.95,
            longitude: -60.64,
        })
    }
}

/// Headlines mentioning "river" share one direction; every other headline
/// gets its own orthogonal axis.
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let dim = texts.len() + 1;
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let mut v = vec![0.0; dim];
                if text.to_lowercase().contains("river") {
                    v[0] = 1.0;
                } else {
                    v[i + 1] = 1.0;
                }
                v
            })
            .collect())
    }
}

/// A browser that always renders `html` and records whether it was closed.
pub struct FakeLauncher {
    pub html: String,
    pub launches: AtomicUsize,
    pub closed: Arc<AtomicBool>,
}

impl FakeLauncher {
    pub fn new(html: String) -> Self {
        Self {
            html,
            launches: AtomicUsize::new(0),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

struct FakeSession {
    html: String,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            html: self.html.clone(),
            closed: Arc::clone(&self.closed),
        }))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn wait_for_selector(&self, _selector: &str, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Capabilities built from fakes, with clustering enabled and no browser.
pub fn fake_capabilities(analysis: Arc<FakeAnalysis>, geocoder: Arc<FakeGeocoder>) -> Capabilities {
    Capabilities {
        analysis,
        content: Arc::new(FakeContent),
        geocoder: Arc::new(CachingGeocoder::new(geocoder)),
        embedder: Some(Arc::new(KeywordEmbedder)),
        browser: None,
    }
}
