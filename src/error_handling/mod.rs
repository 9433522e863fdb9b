//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for initialization, storage, the source registry, and runs
//! - Processing statistics tracking (errors, warnings, info metrics)
//!
//! Counted categories:
//! - **Errors**: Failures isolated to one source or one task
//! - **Warnings**: Degraded results that still let the batch make progress
//! - **Info**: Informational metrics (fallbacks, duplicates, existing rows)

mod stats;
mod types;

pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, ErrorType, InfoType, InitializationError, RunError, SourceConfigError,
    WarningType,
};
