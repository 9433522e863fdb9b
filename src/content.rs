//! Article main-text extraction.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::config::MIN_ARTICLE_TEXT_CHARS;
use crate::utils::sanitize::collapse_whitespace;
use crate::utils::{parse_selector_unsafe, retry_with_policy, RetryPolicy};

static ARTICLE_PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("article p", "article paragraphs"));
static ALL_PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("p", "body paragraphs"));

/// Retrieves the main text of an article page. Best-effort.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn fetch_main_text(&self, url: &str) -> Option<String>;
}

/// Downloads the page and keeps its paragraph text.
#[derive(Debug, Clone)]
pub struct HttpContentExtractor {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpContentExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            policy: RetryPolicy::content(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn download(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl ContentExtractor for HttpContentExtractor {
    async fn fetch_main_text(&self, url: &str) -> Option<String> {
        let label = format!("Downloading article {url}");
        let html = match retry_with_policy(&self.policy, &label, || self.download(url)).await {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to download article {}: {:#}", url, e);
                return None;
            }
        };
        let text = main_text(&html);
        if text.chars().count() < MIN_ARTICLE_TEXT_CHARS {
            log::debug!("Article text too short for {}", url);
            return None;
        }
        Some(text)
    }
}

/// Paragraph text of the `<article>` element, or of the whole page when
/// there is none, one paragraph per line.
pub fn main_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut paragraphs: Vec<String> = document
        .select(&ARTICLE_PARAGRAPHS)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        paragraphs = document
            .select(&ALL_PARAGRAPHS)
            .map(|p| collapse_whitespace(&p.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .collect();
    }
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::time::Duration;

    const LONG_PARAGRAPH: &str = "The provincial government confirmed on Tuesday that the new water treatment plant will begin operating next month, serving more than forty thousand households.";

    #[test]
    fn test_main_text_prefers_article() {
        let html = format!(
            "<nav><p>Menu entry</p></nav><article><p>{LONG_PARAGRAPH}</p><p> Second   line </p></article>"
        );
        assert_eq!(main_text(&html), format!("{LONG_PARAGRAPH}\nSecond line"));
    }

    #[test]
    fn test_main_text_falls_back_to_all_paragraphs() {
        let html = "<div><p>First</p><p>Second</p></div>";
        assert_eq!(main_text(html), "First\nSecond");
    }

    #[tokio::test]
    async fn test_short_text_is_treated_as_missing() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/short"))
                .respond_with(status_code(200).body("<article><p>Too short.</p></article>")),
        );
        let extractor = HttpContentExtractor::new(reqwest::Client::new());
        assert!(extractor.fetch_main_text(&server.url_str("/short")).await.is_none());
    }

    #[tokio::test]
    async fn test_retries_once_then_succeeds() {
        let server = Server::run();
        let page = format!("<article><p>{LONG_PARAGRAPH}</p></article>");
        server.expect(
            Expectation::matching(request::method_path("GET", "/a"))
                .times(2)
                .respond_with(cycle![status_code(502), status_code(200).body(page)]),
        );
        let extractor = HttpContentExtractor::new(reqwest::Client::new())
            .with_retry_policy(RetryPolicy::new(2, Duration::ZERO, 2));
        let text = extractor
            .fetch_main_text(&server.url_str("/a"))
            .await
            .expect("text on second attempt");
        assert_eq!(text, LONG_PARAGRAPH);
    }

    #[tokio::test]
    async fn test_gives_up_after_two_attempts() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/gone"))
                .times(2)
                .respond_with(status_code(500)),
        );
        let extractor = HttpContentExtractor::new(reqwest::Client::new())
            .with_retry_policy(RetryPolicy::new(2, Duration::ZERO, 2));
        assert!(extractor.fetch_main_text(&server.url_str("/gone")).await.is_none());
    }
}
