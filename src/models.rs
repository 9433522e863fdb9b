//! Batch-scoped headline types.

/// A headline as extracted from a source page, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateHeadline {
    pub text: String,
    /// Absolute URL of the linked article
    pub url: String,
    /// Name of the source the headline came from
    pub source: String,
}

impl CandidateHeadline {
    pub fn new(text: impl Into<String>, url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            source: source.into(),
        }
    }
}

/// A headline that passed [`Deduplicator`](crate::dedup::Deduplicator).
///
/// Only the deduplicator builds these, so the case-folded text of every
/// `FilteredHeadline` in a batch is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredHeadline(CandidateHeadline);

impl FilteredHeadline {
    pub(crate) fn new(candidate: CandidateHeadline) -> Self {
        Self(candidate)
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn url(&self) -> &str {
        &self.0.url
    }

    pub fn source(&self) -> &str {
        &self.0.source
    }

    pub fn into_inner(self) -> CandidateHeadline {
        self.0
    }
}

/// A group of batch headlines about the same story.
///
/// `members` are indices into the batch's headline list, sorted ascending.
/// Ids start at 1 and are unique within one batch only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryCluster {
    pub id: i64,
    pub members: Vec<usize>,
}
