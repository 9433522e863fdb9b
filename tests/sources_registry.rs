//! Registry round trips through the file system.

use tempfile::TempDir;

use news_ingest::sources::{select_sources, FetchStrategy, OriginType};
use news_ingest::{SourceConfig, SourceConfigError, SourceRegistry, SourceSelection};

#[tokio::test]
async fn test_add_toggle_and_select() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config").join("sources.json");

    let mut registry = SourceRegistry::load_or_empty(&path).await.expect("empty");
    registry
        .add(SourceConfig::new("Daily", "https://daily.example/", FetchStrategy::Static))
        .await
        .expect("add daily");
    let mut herald = SourceConfig::new("Herald", "https://herald.example/", FetchStrategy::Dynamic);
    herald.origin = OriginType::International;
    registry.add(herald).await.expect("add herald");

    assert!(!registry.toggle("HERALD").await.expect("toggle"));

    let reloaded = SourceRegistry::load(&path).await.expect("reload");
    assert_eq!(reloaded.sources().len(), 2);
    let active = select_sources(reloaded.sources(), &SourceSelection::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Daily");
    assert_eq!(
        reloaded.find("herald").map(|s| s.origin),
        Some(OriginType::International)
    );
}

#[tokio::test]
async fn test_duplicates_are_rejected_and_not_saved() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sources.json");
    let mut registry = SourceRegistry::load_or_empty(&path).await.expect("empty");
    registry
        .add(SourceConfig::new("Daily", "https://daily.example/", FetchStrategy::Static))
        .await
        .expect("add");

    let err = registry
        .add(SourceConfig::new("daily", "https://other.example/", FetchStrategy::Static))
        .await
        .expect_err("duplicate name");
    assert!(matches!(err, SourceConfigError::DuplicateName(_)));

    let err = registry
        .add(SourceConfig::new("Other", "https://daily.example/", FetchStrategy::Static))
        .await
        .expect_err("duplicate url");
    assert!(matches!(err, SourceConfigError::DuplicateUrl(_)));

    let reloaded = SourceRegistry::load(&path).await.expect("reload");
    assert_eq!(reloaded.sources().len(), 1);
}

#[tokio::test]
async fn test_legacy_method_names_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sources.json");
    std::fs::write(
        &path,
        r#"[
            {"name": "Old Static", "url": "https://a.example/", "method": "requests"},
            {"name": "Old Dynamic", "url": "https://b.example/", "method": "selenium", "active": false, "type": "international"}
        ]"#,
    )
    .expect("write");

    let registry = SourceRegistry::load(&path).await.expect("load");
    assert_eq!(registry.sources()[0].method, FetchStrategy::Static);
    assert!(registry.sources()[1].is_dynamic());
    assert!(!registry.sources()[1].active);
}
