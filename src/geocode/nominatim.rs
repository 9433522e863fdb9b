use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GEOCODE_TIMEOUT_SECS;

use super::{Coordinates, Geocoder};

/// Geocoder backed by a Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    region: Option<String>,
    timeout: Duration,
}

// Nominatim reports coordinates as decimal strings.
#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: &str, region: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            region: region.filter(|r| !r.trim().is_empty()).map(String::from),
            timeout: Duration::from_secs(GEOCODE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn query_for(&self, place: &str) -> String {
        match self.region {
            Some(ref region) => format!("{place}, {region}"),
            None => place.to_string(),
        }
    }

    async fn search(&self, place: &str) -> Result<Option<Coordinates>> {
        let query = self.query_for(place);
        let url = format!("{}/search", self.base_url);
        let places: Vec<Place> = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("geocoding request for '{query}' failed"))?
            .error_for_status()?
            .json()
            .await
            .context("malformed geocoder response")?;

        let Some(first) = places.into_iter().next() else {
            return Ok(None);
        };
        let latitude = first.lat.trim().parse::<f64>().context("invalid latitude")?;
        let longitude = first.lon.trim().parse::<f64>().context("invalid longitude")?;
        Ok(Some(Coordinates {
            latitude,
            longitude,
        }))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, place: &str) -> Option<Coordinates> {
        if place.trim().is_empty() {
            return None;
        }
        match self.search(place).await {
            Ok(coords) => coords,
            Err(e) => {
                log::warn!("Geocoding '{}' failed: {:#}", place, e);
                None
            }
        }
    }
}
