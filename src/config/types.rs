//! Configuration types.
//!
//! This module defines the enums and structs used for configuration. The
//! library-facing [`Config`] has no CLI dependencies beyond the `ValueEnum`
//! derives on the log settings.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    DB_PATH, DEFAULT_TOPIC_LABELS, DEFAULT_USER_AGENT, DEFAULT_WORKERS, FETCH_TIMEOUT_SECS,
    MIN_STORY_SIZE, RUN_LOCK_TIMEOUT_SECS, SOURCES_PATH, STORY_SIMILARITY_THRESHOLD,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration.
///
/// Every external capability is optional: a missing endpoint degrades the
/// matching feature (no clustering, no enrichment, no dynamic sources) instead
/// of failing the run.
///
/// # Examples
///
/// ```no_run
/// use news_ingest::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     sources_path: PathBuf::from("config/sources.json"),
///     workers: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the source registry
    pub sources_path: PathBuf,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Size of the enrichment worker pool
    pub workers: usize,

    /// Per-request timeout for source pages in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Seconds to wait for the run lock before aborting
    pub lock_timeout_seconds: u64,

    /// Base URL of the Browserless service used for dynamic sources
    pub browserless_url: Option<String>,

    /// Browserless API token
    pub browserless_token: Option<String>,

    /// Base URL of the NLP analysis service
    pub analysis_url: Option<String>,

    /// Base URL of the sentence-embedding service
    pub embedding_url: Option<String>,

    /// Base URL of a Nominatim-compatible geocoder
    pub geocoder_url: Option<String>,

    /// Appended to every place name before geocoding (e.g. a country)
    pub geocode_region: Option<String>,

    /// Candidate labels for topic classification
    pub topic_labels: Vec<String>,

    /// Cosine similarity threshold for story clustering
    pub story_threshold: f32,

    /// Minimum number of headlines in a story
    pub min_story_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources_path: PathBuf::from(SOURCES_PATH),
            db_path: PathBuf::from(DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            workers: DEFAULT_WORKERS,
            timeout_seconds: FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            lock_timeout_seconds: RUN_LOCK_TIMEOUT_SECS,
            browserless_url: None,
            browserless_token: None,
            analysis_url: None,
            embedding_url: None,
            geocoder_url: None,
            geocode_region: None,
            topic_labels: DEFAULT_TOPIC_LABELS.iter().map(|s| s.to_string()).collect(),
            story_threshold: STORY_SIMILARITY_THRESHOLD,
            min_story_size: MIN_STORY_SIZE,
        }
    }
}

impl Config {
    /// Path of the lock file guarding batch runs (next to the database).
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .db_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "headlines.db".into());
        name.push(".lock");
        self.db_path.with_file_name(name)
    }
}
