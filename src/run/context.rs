//! External capabilities injected into a batch.

use std::sync::Arc;

use crate::analysis::{AnalysisEngine, DisabledAnalysisEngine, HttpAnalysisEngine};
use crate::clustering::{Embedder, HttpEmbedder};
use crate::config::Config;
use crate::content::{ContentExtractor, HttpContentExtractor};
use crate::error_handling::InitializationError;
use crate::fetch::{BrowserLauncher, BrowserlessLauncher};
use crate::geocode::{CachingGeocoder, DisabledGeocoder, Geocoder, NominatimGeocoder};
use crate::initialization::{init_client, init_service_client};

/// Handles to every model and service the pipeline calls out to.
///
/// Built once per run. `embedder` and `browser` are optional: without an
/// embedder no stories are formed, without a browser dynamic sources yield
/// nothing.
#[derive(Clone)]
pub struct Capabilities {
    pub analysis: Arc<dyn AnalysisEngine>,
    pub content: Arc<dyn ContentExtractor>,
    pub geocoder: Arc<dyn Geocoder>,
    pub embedder: Option<Arc<dyn Embedder>>,
    pub browser: Option<Arc<dyn BrowserLauncher>>,
}

impl Capabilities {
    /// Wires the HTTP-backed implementations for every configured endpoint.
    ///
    /// The geocoder is always wrapped in a [`CachingGeocoder`] so every task of
    /// the run shares one cache.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        let service_client = init_service_client(config)?;

        let analysis: Arc<dyn AnalysisEngine> = match config.analysis_url.as_deref() {
            Some(url) => {
                log::info!("Analysis service: {}", url);
                Arc::new(HttpAnalysisEngine::new(
                    service_client.clone(),
                    url,
                    config.topic_labels.clone(),
                ))
            }
            None => {
                log::warn!("No analysis service configured; headlines are stored without NLP fields");
                Arc::new(DisabledAnalysisEngine)
            }
        };

        let geocoder: Arc<dyn Geocoder> = match config.geocoder_url.as_deref() {
            Some(url) => Arc::new(NominatimGeocoder::new(
                client.clone(),
                url,
                config.geocode_region.as_deref(),
            )),
            None => Arc::new(DisabledGeocoder),
        };

        let embedder = config.embedding_url.as_deref().map(|url| {
            Arc::new(HttpEmbedder::new(service_client.clone(), url)) as Arc<dyn Embedder>
        });
        if embedder.is_none() {
            log::warn!("No embedding service configured; story clustering disabled");
        }

        let browser = config.browserless_url.as_deref().map(|url| {
            Arc::new(BrowserlessLauncher::new(
                service_client.clone(),
                url,
                config.browserless_token.as_deref(),
            )) as Arc<dyn BrowserLauncher>
        });

        Ok(Self {
            analysis,
            content: Arc::new(HttpContentExtractor::new(client)),
            geocoder: Arc::new(CachingGeocoder::new(geocoder)),
            embedder,
            browser,
        })
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("embedder", &self.embedder.is_some())
            .field("browser", &self.browser.is_some())
            .finish_non_exhaustive()
    }
}
