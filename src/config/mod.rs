//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, retry schedules, thresholds)
//! - The library configuration struct
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

pub use cli::{Command, GlobalOpts, Opt, ScrapeOpts, SourcesCommand};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
