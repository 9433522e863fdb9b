//! Error type definitions.
//!
//! This module defines the typed errors returned by the library and the
//! error, warning, and info categories counted during a batch.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file or its directory.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A value could not be encoded for storage.
    #[error("Encoding error: {0}")]
    EncodingError(#[from] serde_json::Error),
}

/// Error types for the source registry.
#[derive(Error, Debug)]
pub enum SourceConfigError {
    /// The registry file could not be read or written.
    #[error("Source registry I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry file is not a valid JSON source list.
    #[error("Invalid source registry {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two sources share a name (compared case-insensitively).
    #[error("Duplicate source name: {0}")]
    DuplicateName(String),

    /// Two sources share a URL.
    #[error("Duplicate source url: {0}")]
    DuplicateUrl(String),

    /// A source URL is not an absolute http(s) URL.
    #[error("Invalid url for source {name}: {url}")]
    InvalidUrl { name: String, url: String },

    /// No source with this name exists.
    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

/// Errors that abort a batch run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Another run holds the lock and did not release it in time.
    #[error("Another ingest run holds {path} (waited {waited_secs}s)")]
    LockContention { path: PathBuf, waited_secs: u64 },

    /// The lock file could not be opened or locked for a reason other than
    /// contention.
    #[error("Failed to open run lock {path}: {source}")]
    LockIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Sources(#[from] SourceConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Initialization(#[from] InitializationError),
}

/// Failures counted during a batch.
///
/// None of these abort the run; they are isolated to one source or one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// A source failed after every retry attempt
    SourceFetchError,
    /// The headless browser could not be started
    BrowserLaunchError,
    /// Closing the browser session failed
    BrowserCloseError,
    /// The article row could not be written
    ArticleWriteError,
    /// Quote rows could not be written
    QuoteWriteError,
    /// An enrichment task panicked or was cancelled
    TaskJoinError,
}

/// Degraded results that don't prevent a headline from being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// A source produced no headlines at all
    EmptySource,
    /// Main text could not be retrieved; summary placeholder stored
    MissingFullText,
    /// No stories could be formed because embeddings were unavailable
    ClusteringUnavailable,
    /// A dynamic source was skipped because no browser was available
    DynamicSourceSkipped,
}

/// Notable events that are neither errors nor warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// The link fallback heuristic produced the headlines of a page
    FallbackLinksUsed,
    /// The headline was too short to keep
    ShortHeadline,
    /// The headline repeated one already seen in the batch
    DuplicateHeadline,
    /// The article url was already stored by an earlier run
    ExistingArticle,
    /// Location resolved to coordinates
    Geocoded,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::SourceFetchError => "Source fetch error",
            ErrorType::BrowserLaunchError => "Browser launch error",
            ErrorType::BrowserCloseError => "Browser close error",
            ErrorType::ArticleWriteError => "Article write error",
            ErrorType::QuoteWriteError => "Quote write error",
            ErrorType::TaskJoinError => "Task join error",
        }
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::EmptySource => "Empty source",
            WarningType::MissingFullText => "Missing full text",
            WarningType::ClusteringUnavailable => "Clustering unavailable",
            WarningType::DynamicSourceSkipped => "Dynamic source skipped",
        }
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::FallbackLinksUsed => "Fallback links used",
            InfoType::ShortHeadline => "Short headline dropped",
            InfoType::DuplicateHeadline => "Duplicate headline dropped",
            InfoType::ExistingArticle => "Existing article",
            InfoType::Geocoded => "Location geocoded",
        }
    }
}
