//! Headless browser capability.
//!
//! The fetch phase of a batch shares one [`BrowserSession`] across every
//! dynamic source. The shipped implementation talks to a Browserless
//! instance over its `/content` API, which renders a page and returns the
//! resulting HTML.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;
use url::Url;

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A single browser tab driven by the fetcher.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigates to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Waits up to `timeout` for `selector` to appear.
    ///
    /// `Ok(false)` means the selector never showed up, which callers treat as
    /// non-fatal.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<bool>;

    /// The current page HTML.
    async fn page_source(&self) -> Result<String>;

    async fn close(&self) -> Result<()>;
}

/// Launches sessions against a Browserless endpoint.
#[derive(Debug, Clone)]
pub struct BrowserlessLauncher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessLauncher {
    pub fn new(client: reqwest::Client, base_url: &str, token: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }
}

#[async_trait]
impl BrowserLauncher for BrowserlessLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let mut endpoint = Url::parse(&format!("{}/content", self.base_url))
            .with_context(|| format!("invalid Browserless url: {}", self.base_url))?;
        if let Some(ref token) = self.token {
            endpoint.query_pairs_mut().append_pair("token", token);
        }
        log::info!("Using Browserless at {}", self.base_url);
        Ok(Box::new(BrowserlessSession {
            client: self.client.clone(),
            endpoint,
            state: Mutex::new(SessionState::default()),
        }))
    }
}

#[derive(Debug, Default)]
struct SessionState {
    current_url: Option<String>,
    rendered: Option<String>,
    closed: bool,
}

/// A Browserless-backed session.
///
/// Browserless renders each request in a fresh page, so the session keeps the
/// current url and the last rendered HTML.
#[derive(Debug)]
pub struct BrowserlessSession {
    client: reqwest::Client,
    endpoint: Url,
    state: Mutex<SessionState>,
}

impl BrowserlessSession {
    async fn render(&self, body: serde_json::Value) -> Result<reqwest::Response> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .context("Browserless request failed")?;
        Ok(resp)
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.state.lock().await;
        if state.closed {
            bail!("browser session is closed");
        }
        match state.current_url.clone() {
            Some(url) => Ok(url),
            None => bail!("no page loaded"),
        }
    }
}

#[async_trait]
impl BrowserSession for BrowserlessSession {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.closed {
            bail!("browser session is closed");
        }
        state.current_url = Some(url.to_string());
        state.rendered = None;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let url = self.current_url().await?;
        let resp = self
            .render(json!({
                "url": url,
                "waitForSelector": {
                    "selector": selector,
                    "timeout": timeout.as_millis() as u64,
                },
            }))
            .await?;

        if !resp.status().is_success() {
            log::debug!(
                "Selector '{}' did not appear on {} (status {})",
                selector,
                url,
                resp.status()
            );
            return Ok(false);
        }
        let html = resp.text().await.context("failed to read rendered page")?;
        self.state.lock().await.rendered = Some(html);
        Ok(true)
    }

    async fn page_source(&self) -> Result<String> {
        if let Some(html) = self.state.lock().await.rendered.clone() {
            return Ok(html);
        }
        let url = self.current_url().await?;
        let resp = self.render(json!({ "url": url })).await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            bail!("Browserless returned {} for {}: {}", status, url, message);
        }
        let html = resp.text().await.context("failed to read rendered page")?;
        self.state.lock().await.rendered = Some(html.clone());
        Ok(html)
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.current_url = None;
        state.rendered = None;
        Ok(())
    }
}
