//! Plain HTTP source fetches.

use anyhow::{Context, Result};
use scraper::Html;
use url::Url;

use crate::sources::SourceConfig;
use crate::utils::parse_selector_with_fallback;

use super::extract::extract_headlines;
use super::{into_candidates, FetchedPage};

/// One GET of the source page; non-2xx responses are errors.
pub(super) async fn fetch_static(client: &reqwest::Client, source: &SourceConfig) -> Result<FetchedPage> {
    let base = Url::parse(&source.url)
        .with_context(|| format!("invalid source url: {}", source.url))?;
    let body = client
        .get(base.clone())
        .send()
        .await
        .with_context(|| format!("request to {} failed", source.url))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("failed to read body of {}", source.url))?;

    let document = Html::parse_document(&body);
    let selector = parse_selector_with_fallback(&source.selector, &source.name);
    let links = extract_headlines(&document, &base, &selector);

    Ok(FetchedPage {
        headlines: into_candidates(links, source),
        used_fallback: false,
    })
}
