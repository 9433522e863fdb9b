//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, retry schedules, and heuristic thresholds.

use std::time::Duration;

/// Default number of concurrent enrichment workers
pub const DEFAULT_WORKERS: usize = 10;
/// Default path of the SQLite database
pub const DB_PATH: &str = "./headlines.db";
/// Default path of the source registry
pub const SOURCES_PATH: &str = "./config/sources.json";

/// Per-request timeout for source pages in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 15;
/// How long a batch run waits for the run lock before giving up
pub const RUN_LOCK_TIMEOUT_SECS: u64 = 10;
/// Poll interval while waiting for the run lock
pub const RUN_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// SQLite busy timeout; concurrent writers wait on the database lock this long
pub const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Retry strategy for static page fetches
/// Total attempts (initial attempt + retries)
pub const STATIC_RETRY_MAX_ATTEMPTS: usize = 3;
/// Delay before the first retry in milliseconds
pub const STATIC_RETRY_INITIAL_DELAY_MS: u64 = 5_000;

// Retry strategy for browser-rendered fetches
pub const DYNAMIC_RETRY_MAX_ATTEMPTS: usize = 3;
pub const DYNAMIC_RETRY_INITIAL_DELAY_MS: u64 = 10_000;

// Retry strategy for article main-text extraction
pub const CONTENT_RETRY_MAX_ATTEMPTS: usize = 2;
pub const CONTENT_RETRY_INITIAL_DELAY_MS: u64 = 3_000;

/// Attempts at writing an article's quotes before they are counted as lost
pub const QUOTE_WRITE_ATTEMPTS: usize = 2;

/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_BACKOFF_MULTIPLIER: u32 = 2;

// Browser-rendered pages
/// Maximum time to wait for the source selector to appear
pub const SELECTOR_WAIT_TIMEOUT: Duration = Duration::from_secs(20);
/// Fixed pause after navigation so late-loading content can render
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Default extraction selector for new sources
pub const DEFAULT_HEADLINE_SELECTOR: &str = "h1, h2, h3";

// Fallback link heuristic (applied when the selector finds nothing)
/// A fallback link must contain more than this many words
pub const FALLBACK_MIN_WORDS: usize = 6;
/// A fallback link must be longer than this many characters
pub const FALLBACK_MIN_CHARS: usize = 35;

/// Headlines with this many words or fewer are dropped
pub const MIN_HEADLINE_WORDS: usize = 4;

// Story clustering
/// Cosine similarity at or above which two headlines belong to the same story
pub const STORY_SIMILARITY_THRESHOLD: f32 = 0.75;
/// Minimum number of headlines that make a story
pub const MIN_STORY_SIZE: usize = 2;

// Summaries
pub const SUMMARY_MAX_LENGTH: usize = 150;
pub const SUMMARY_MIN_LENGTH: usize = 30;
/// Stored instead of a summary when no article text could be retrieved
pub const SUMMARY_PLACEHOLDER: &str = "Summary unavailable: article text could not be retrieved.";

/// Extracted article text shorter than this is treated as missing
pub const MIN_ARTICLE_TEXT_CHARS: usize = 100;
/// Timeout for a single geocoding lookup
pub const GEOCODE_TIMEOUT_SECS: u64 = 10;
/// Timeout for calls to the analysis and embedding services
pub const CAPABILITY_TIMEOUT_SECS: u64 = 120;

/// Default topic labels offered to the topic classifier
pub const DEFAULT_TOPIC_LABELS: &[&str] = &[
    "CRIME",
    "ECONOMY",
    "INFLATION",
    "CURRENCY",
    "POVERTY",
    "POLITICS",
    "CORRUPTION",
    "JUSTICE",
    "MEDIA",
    "LABOR",
    "EDUCATION",
    "HEALTH",
    "PANDEMIC",
    "GENDER",
    "OTHER SOCIAL",
    "OTHER NON-SOCIAL",
];
