//! Browser-rendered source fetches.

use std::time::Duration;

use anyhow::{Context, Result};
use scraper::Html;
use url::Url;

use crate::sources::SourceConfig;
use crate::utils::parse_selector_with_fallback;

use super::browser::BrowserSession;
use super::extract::{extract_fallback_links, extract_headlines};
use super::{into_candidates, FetchedPage};

/// Renders the source page in `session` and extracts headlines.
///
/// The selector wait is best-effort. After a fixed settle pause the page
/// source is parsed; when the selector yields nothing, long link texts are
/// used instead.
pub(super) async fn fetch_dynamic(
    session: &dyn BrowserSession,
    source: &SourceConfig,
    selector_timeout: Duration,
    settle_delay: Duration,
) -> Result<FetchedPage> {
    let base = Url::parse(&source.url)
        .with_context(|| format!("invalid source url: {}", source.url))?;

    session.goto(&source.url).await?;
    match session.wait_for_selector(&source.selector, selector_timeout).await {
        Ok(true) => {}
        Ok(false) => log::debug!("Selector '{}' not found on {}", source.selector, source.name),
        Err(e) => log::debug!("Waiting for selector on {} failed: {:#}", source.name, e),
    }
    tokio::time::sleep(settle_delay).await;
    let html = session.page_source().await?;

    let document = Html::parse_document(&html);
    let selector = parse_selector_with_fallback(&source.selector, &source.name);
    let links = extract_headlines(&document, &base, &selector);
    let page = if links.is_empty() {
        log::info!("Selector found nothing on {}, trying link fallback", source.name);
        FetchedPage {
            headlines: into_candidates(extract_fallback_links(&document, &base), source),
            used_fallback: true,
        }
    } else {
        FetchedPage {
            headlines: into_candidates(links, source),
            used_fallback: false,
        }
    };
    Ok(page)
}
