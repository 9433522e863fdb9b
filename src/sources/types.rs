//! Source descriptors.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HEADLINE_SELECTOR;

/// How a source page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Single HTTP GET of the page HTML
    #[serde(alias = "requests")]
    Static,
    /// Rendered in a headless browser before extraction
    #[serde(alias = "selenium")]
    Dynamic,
}

/// Whether a source covers local or international news.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OriginType {
    #[default]
    Local,
    International,
}

/// One configured news source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    #[serde(default = "default_selector")]
    pub selector: String,
    pub method: FetchStrategy,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "type", default)]
    pub origin: OriginType,
}

fn default_selector() -> String {
    DEFAULT_HEADLINE_SELECTOR.to_string()
}

fn default_active() -> bool {
    true
}

impl SourceConfig {
    /// A new active source using the default selector.
    pub fn new(name: impl Into<String>, url: impl Into<String>, method: FetchStrategy) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            selector: default_selector(),
            method,
            active: true,
            origin: OriginType::Local,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.method == FetchStrategy::Dynamic
    }
}

/// Which sources a batch should cover.
///
/// `Named` with an empty list selects nothing; it does not mean "all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Every source whose `active` flag is set
    Active,
    /// Exactly these sources, by name, regardless of the active flag
    Named(Vec<String>),
}

impl SourceSelection {
    /// `None` (no explicit list given) selects the active sources.
    pub fn from_names(names: Option<Vec<String>>) -> Self {
        match names {
            Some(names) => SourceSelection::Named(names),
            None => SourceSelection::Active,
        }
    }
}
