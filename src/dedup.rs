//! Headline filtering.
//!
//! Drops headlines that are too short to be meaningful and headlines whose
//! case-folded text was already seen earlier in the batch (from any source).

use std::collections::HashSet;

use crate::config::MIN_HEADLINE_WORDS;
use crate::models::{CandidateHeadline, FilteredHeadline};
use crate::utils::sanitize::word_count;

/// Batch-scoped deduplicator.
///
/// Create one per batch and feed it each source's candidates in turn; the
/// seen set carries over between calls.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    short_dropped: usize,
    duplicates_dropped: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters `candidates`, preserving order.
    ///
    /// A headline with `MIN_HEADLINE_WORDS` words or fewer is dropped. Of the
    /// rest only the first occurrence of each lowercased text is kept.
    pub fn filter(&mut self, candidates: Vec<CandidateHeadline>) -> Vec<FilteredHeadline> {
        let mut kept = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if word_count(&candidate.text) <= MIN_HEADLINE_WORDS {
                self.short_dropped += 1;
                continue;
            }
            if !self.seen.insert(candidate.text.to_lowercase()) {
                log::debug!("Dropping duplicate headline: {}", candidate.text);
                self.duplicates_dropped += 1;
                continue;
            }
            kept.push(FilteredHeadline::new(candidate));
        }
        kept
    }

    /// Headlines dropped for being too short.
    pub fn short_dropped(&self) -> usize {
        self.short_dropped
    }

    /// Headlines dropped because their text was already seen.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }
}
