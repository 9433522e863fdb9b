//! CSS selector parsing utilities.

use scraper::Selector;

use crate::config::DEFAULT_HEADLINE_SELECTOR;

/// Parses a configured CSS selector, falling back to the default headline selector.
///
/// Source selectors come from the registry file, so a typo must not stop the
/// batch. The failure is logged with `context` (usually the source name).
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse CSS selector '{}' for {}: {}. Using '{}'.",
            selector_str,
            context,
            e,
            DEFAULT_HEADLINE_SELECTOR
        );
        parse_selector_unsafe(DEFAULT_HEADLINE_SELECTOR, "default headline selector")
    })
}

/// Parses a CSS selector that must succeed (for compile-time constants).
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}
