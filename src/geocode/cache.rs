use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Coordinates, Geocoder};

/// Memoizes another geocoder, including its misses.
///
/// The map is shared by every enrichment task of a run. Two tasks asking for
/// the same uncached place may both hit the service; the last answer wins.
pub struct CachingGeocoder {
    inner: Arc<dyn Geocoder>,
    cache: Mutex<HashMap<String, Option<Coordinates>>>,
}

impl CachingGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, place: &str) -> Option<Option<Coordinates>> {
        match self.cache.lock() {
            Ok(cache) => cache.get(place).copied(),
            Err(poisoned) => poisoned.into_inner().get(place).copied(),
        }
    }

    fn store(&self, place: &str, coords: Option<Coordinates>) {
        let mut cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.insert(place.to_string(), coords);
    }

    pub fn len(&self) -> usize {
        match self.cache.lock() {
            Ok(cache) => cache.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Geocoder for CachingGeocoder {
    async fn resolve(&self, place: &str) -> Option<Coordinates> {
        if let Some(hit) = self.cached(place) {
            log::debug!("Geocode cache hit for '{}'", place);
            return hit;
        }
        let coords = self.inner.resolve(place).await;
        self.store(place, coords);
        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGeocoder {
        calls: AtomicUsize,
        answer: Option<Coordinates>,
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn resolve(&self, _place: &str) -> Option<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    #[tokio::test]
    async fn test_hits_are_cached() {
        let inner = Arc::new(CountingGeocoder {
            calls: AtomicUsize::new(0),
            answer: Some(Coordinates {
                latitude: -34.6,
                longitude: -58.4,
            }),
        });
        let geocoder = CachingGeocoder::new(inner.clone());
        let first = geocoder.resolve("Buenos Aires").await;
        let second = geocoder.resolve("Buenos Aires").await;
        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_misses_are_cached_too() {
        let inner = Arc::new(CountingGeocoder {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let geocoder = CachingGeocoder::new(inner.clone());
        assert!(geocoder.resolve("Nowhere").await.is_none());
        assert!(geocoder.resolve("Nowhere").await.is_none());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.len(), 1);
    }
}
