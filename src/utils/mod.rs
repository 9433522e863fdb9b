//! Shared utilities.
//!
//! This module provides:
//! - Retry policies with exponential backoff
//! - Text normalization for scraped strings
//! - CSS selector parsing utilities

mod retry;
pub mod sanitize;
mod selector;

pub use retry::{retry_with_policy, RetryPolicy};
pub use selector::{parse_selector_unsafe, parse_selector_with_fallback};
