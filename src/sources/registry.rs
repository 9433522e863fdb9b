//! Loading, validating and saving the source list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error_handling::SourceConfigError;

use super::types::{SourceConfig, SourceSelection};

/// The ordered list of configured sources, bound to the file it came from.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    path: PathBuf,
    sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    /// Reads and validates the registry at `path`.
    ///
    /// # Errors
    ///
    /// A missing file, malformed JSON, duplicate names or urls, and
    /// non-http(s) urls are all errors.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SourceConfigError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceConfigError::Io {
                path: path.clone(),
                source,
            })?;
        let sources: Vec<SourceConfig> =
            serde_json::from_str(&raw).map_err(|source| SourceConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        validate(&sources)?;
        log::debug!("Loaded {} sources from {}", sources.len(), path.display());
        Ok(Self { path, sources })
    }

    /// Like [`load`](Self::load), but a missing file yields an empty registry.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Result<Self, SourceConfigError> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            Ok(Self {
                path: path.to_path_buf(),
                sources: Vec::new(),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn into_sources(self) -> Vec<SourceConfig> {
        self.sources
    }

    /// Finds a source by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&SourceConfig> {
        self.sources
            .iter()
            .find(|s| same_name(&s.name, name))
    }

    /// Replaces the whole list and writes it to disk.
    pub async fn replace_all(&mut self, sources: Vec<SourceConfig>) -> Result<(), SourceConfigError> {
        validate(&sources)?;
        self.sources = sources;
        self.save().await
    }

    /// Appends a source and saves the list.
    ///
    /// # Errors
    ///
    /// `DuplicateName` when a source with the same name (any case) exists,
    /// `DuplicateUrl` when the url is already registered.
    pub async fn add(&mut self, source: SourceConfig) -> Result<(), SourceConfigError> {
        let mut sources = self.sources.clone();
        sources.push(source);
        self.replace_all(sources).await
    }

    /// Sets the active flag of the named source and saves the list.
    pub async fn set_active(&mut self, name: &str, active: bool) -> Result<(), SourceConfigError> {
        let mut sources = self.sources.clone();
        let source = sources
            .iter_mut()
            .find(|s| same_name(&s.name, name))
            .ok_or_else(|| SourceConfigError::UnknownSource(name.to_string()))?;
        source.active = active;
        self.replace_all(sources).await
    }

    /// Flips the active flag of the named source; returns the new value.
    pub async fn toggle(&mut self, name: &str) -> Result<bool, SourceConfigError> {
        let active = !self
            .find(name)
            .ok_or_else(|| SourceConfigError::UnknownSource(name.to_string()))?
            .active;
        self.set_active(name, active).await?;
        Ok(active)
    }

    /// Writes the list as pretty-printed JSON.
    ///
    /// The file is written next to the target and renamed over it, so readers
    /// never observe a half-written list.
    pub async fn save(&self) -> Result<(), SourceConfigError> {
        let io_err = |source| SourceConfigError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(&self.sources).map_err(|source| {
            SourceConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

/// Resolves a selection against the configured sources, in registry order.
///
/// Names must match exactly; unknown names are logged and skipped.
pub fn select_sources(sources: &[SourceConfig], selection: &SourceSelection) -> Vec<SourceConfig> {
    match selection {
        SourceSelection::Active => sources.iter().filter(|s| s.active).cloned().collect(),
        SourceSelection::Named(names) => {
            for name in names {
                if !sources.iter().any(|s| &s.name == name) {
                    log::warn!("Requested source '{}' is not configured", name);
                }
            }
            sources
                .iter()
                .filter(|s| names.contains(&s.name))
                .cloned()
                .collect()
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn validate(sources: &[SourceConfig]) -> Result<(), SourceConfigError> {
    let mut names = HashSet::new();
    let mut urls = HashSet::new();
    for source in sources {
        if !names.insert(source.name.to_lowercase()) {
            return Err(SourceConfigError::DuplicateName(source.name.clone()));
        }
        if !urls.insert(source.url.as_str()) {
            return Err(SourceConfigError::DuplicateUrl(source.url.clone()));
        }
        match Url::parse(&source.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(SourceConfigError::InvalidUrl {
                    name: source.name.clone(),
                    url: source.url.clone(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::FetchStrategy;
    use tempfile::TempDir;

    fn sample() -> Vec<SourceConfig> {
        let mut inactive = SourceConfig::new("Herald", "https://herald.example", FetchStrategy::Dynamic);
        inactive.active = false;
        vec![
            SourceConfig::new("Daily", "https://daily.example", FetchStrategy::Static),
            inactive,
            SourceConfig::new("Courier", "https://courier.example/news", FetchStrategy::Static),
        ]
    }

    async fn registry_in(dir: &TempDir) -> SourceRegistry {
        let path = dir.path().join("sources.json");
        let mut registry = SourceRegistry::load_or_empty(&path).await.expect("empty registry");
        registry.replace_all(sample()).await.expect("saved");
        registry
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = TempDir::new().expect("temp dir");
        let registry = registry_in(&dir).await;
        let loaded = SourceRegistry::load(registry.path()).await.expect("loads");
        let names: Vec<_> = loaded.sources().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Daily", "Herald", "Courier"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let err = SourceRegistry::load(dir.path().join("nope.json"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, SourceConfigError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("sources.json");
        tokio::fs::write(&path, "{not json").await.expect("write");
        let err = SourceRegistry::load(&path).await.expect_err("bad json");
        assert!(matches!(err, SourceConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_name_ignoring_case() {
        let dir = TempDir::new().expect("temp dir");
        let mut registry = registry_in(&dir).await;
        let err = registry
            .add(SourceConfig::new("DAILY", "https://other.example", FetchStrategy::Static))
            .await
            .expect_err("duplicate name");
        assert!(matches!(err, SourceConfigError::DuplicateName(_)));
        assert_eq!(registry.sources().len(), 3);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_url() {
        let dir = TempDir::new().expect("temp dir");
        let mut registry = registry_in(&dir).await;
        let err = registry
            .add(SourceConfig::new("Other", "https://daily.example", FetchStrategy::Static))
            .await
            .expect_err("duplicate url");
        assert!(matches!(err, SourceConfigError::DuplicateUrl(_)));
    }

    #[tokio::test]
    async fn test_add_rejects_relative_url() {
        let dir = TempDir::new().expect("temp dir");
        let mut registry = registry_in(&dir).await;
        let err = registry
            .add(SourceConfig::new("Other", "/news", FetchStrategy::Static))
            .await
            .expect_err("relative url");
        assert!(matches!(err, SourceConfigError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_add_appends_and_persists() {
        let dir = TempDir::new().expect("temp dir");
        let mut registry = registry_in(&dir).await;
        registry
            .add(SourceConfig::new("Gazette", "https://gazette.example", FetchStrategy::Static))
            .await
            .expect("added");
        let loaded = SourceRegistry::load(registry.path()).await.expect("loads");
        assert_eq!(loaded.sources().len(), 4);
        assert_eq!(loaded.sources()[3].name, "Gazette");
    }

    #[tokio::test]
    async fn test_toggle_flips_and_persists() {
        let dir = TempDir::new().expect("temp dir");
        let mut registry = registry_in(&dir).await;
        assert!(registry.toggle("herald").await.expect("toggled"));
        let loaded = SourceRegistry::load(registry.path()).await.expect("loads");
        assert!(loaded.find("Herald").expect("present").active);

        let err = registry.toggle("missing").await.expect_err("unknown");
        assert!(matches!(err, SourceConfigError::UnknownSource(_)));
    }

    #[test]
    fn test_select_active_skips_inactive() {
        let selected = select_sources(&sample(), &SourceSelection::Active);
        let names: Vec<_> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Daily", "Courier"]);
    }

    #[test]
    fn test_select_named_includes_inactive_and_ignores_unknown() {
        let selection = SourceSelection::Named(vec!["Herald".into(), "Unknown".into()]);
        let selected = select_sources(&sample(), &selection);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Herald");
    }

    #[test]
    fn test_select_named_matches_case_exactly() {
        let selection = SourceSelection::Named(vec!["herald".into()]);
        assert!(select_sources(&sample(), &selection).is_empty());
    }

    #[test]
    fn test_select_named_empty_selects_nothing() {
        let selected = select_sources(&sample(), &SourceSelection::Named(vec![]));
        assert!(selected.is_empty());
    }
}
