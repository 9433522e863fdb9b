//! Place-name geocoding.

mod cache;
mod nominatim;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cache::CachingGeocoder;
pub use nominatim::NominatimGeocoder;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves a place name to coordinates.
///
/// Implementations never fail: an unknown place or an unavailable service is
/// reported as `None`.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, place: &str) -> Option<Coordinates>;
}

/// Geocoder used when no service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn resolve(&self, _place: &str) -> Option<Coordinates> {
        None
    }
}
