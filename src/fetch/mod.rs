//! Headline fetching.
//!
//! One source in, a list of candidate headlines out. Static sources are a
//! single HTTP GET; dynamic sources are rendered through a [`BrowserSession`].
//! Both strategies run under a [`RetryPolicy`]; a source whose attempts are
//! exhausted returns the last error and the caller moves on.

mod browser;
mod dynamic;
mod extract;
mod static_page;

use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::config::{SELECTOR_WAIT_TIMEOUT, SETTLE_DELAY};
use crate::models::CandidateHeadline;
use crate::sources::{FetchStrategy, SourceConfig};
use crate::utils::{retry_with_policy, RetryPolicy};

pub use browser::{BrowserLauncher, BrowserSession, BrowserlessLauncher, BrowserlessSession};
pub use extract::{extract_fallback_links, extract_headlines, ExtractedLink};

/// Headlines found on one source page.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub headlines: Vec<CandidateHeadline>,
    /// Set when the selector matched nothing and the link heuristic was used
    pub used_fallback: bool,
}

/// Fetches headlines from sources with the configured strategy.
#[derive(Debug, Clone)]
pub struct HeadlineFetcher {
    client: reqwest::Client,
    static_policy: RetryPolicy,
    dynamic_policy: RetryPolicy,
    selector_timeout: Duration,
    settle_delay: Duration,
}

impl HeadlineFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            static_policy: RetryPolicy::static_fetch(),
            dynamic_policy: RetryPolicy::dynamic_fetch(),
            selector_timeout: SELECTOR_WAIT_TIMEOUT,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_retry_policies(mut self, static_policy: RetryPolicy, dynamic_policy: RetryPolicy) -> Self {
        self.static_policy = static_policy;
        self.dynamic_policy = dynamic_policy;
        self
    }

    /// Overrides the selector wait and the settle pause for rendered pages.
    pub fn with_browser_timings(mut self, selector_timeout: Duration, settle_delay: Duration) -> Self {
        self.selector_timeout = selector_timeout;
        self.settle_delay = settle_delay;
        self
    }

    /// Fetches one source, retrying according to its strategy's policy.
    ///
    /// Dynamic sources need `browser`; without one they fail immediately.
    pub async fn fetch(
        &self,
        source: &SourceConfig,
        browser: Option<&dyn BrowserSession>,
    ) -> Result<FetchedPage> {
        let label = format!("Fetching {} ({})", source.name, source.url);
        let page = match source.method {
            FetchStrategy::Static => {
                retry_with_policy(&self.static_policy, &label, || {
                    static_page::fetch_static(&self.client, source)
                })
                .await?
            }
            FetchStrategy::Dynamic => {
                let session =
                    browser.ok_or_else(|| anyhow!("no browser session for {}", source.name))?;
                retry_with_policy(&self.dynamic_policy, &label, || {
                    dynamic::fetch_dynamic(session, source, self.selector_timeout, self.settle_delay)
                })
                .await?
            }
        };

        if page.headlines.is_empty() {
            log::warn!("No headlines found on {} ({})", source.name, source.url);
        } else {
            log::info!(
                "Found {} headlines on {}{}",
                page.headlines.len(),
                source.name,
                if page.used_fallback { " (link fallback)" } else { "" }
            );
        }
        Ok(page)
    }
}

fn into_candidates(links: Vec<ExtractedLink>, source: &SourceConfig) -> Vec<CandidateHeadline> {
    links
        .into_iter()
        .map(|link| CandidateHeadline::new(link.text, link.url, source.name.clone()))
        .collect()
}
