//! Backend selection with the bundled providers

use std::path::PathBuf;
use std::sync::Arc;

use pkgfeed_application::registry::{
    ContextCapability, DatabaseCapability, ProviderRegistry, SearchCapability,
    SearchIndexerCapability, ServiceRoot, StorageCapability,
};
use pkgfeed_domain::error::Error;
use pkgfeed_domain::value_objects::{FeedConfig, Package, SearchRequest};

fn registry() -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    pkgfeed_providers::register_all(&mut registry).expect("bundled providers register");
    Arc::new(registry)
}

fn config_in(dir: &tempfile::TempDir) -> FeedConfig {
    let mut config = FeedConfig::default();
    config.storage.path = Some(dir.path().join("blobs"));
    config
}

#[test]
fn test_registration_order() {
    let registry = registry();
    assert_eq!(
        registry.capability_names(),
        vec!["context", "database", "storage", "search", "search_indexer"]
    );
    assert_eq!(registry.provider_names::<ContextCapability>(), vec!["memory", "json"]);
    assert_eq!(registry.provider_names::<StorageCapability>(), vec!["file", "memory"]);
    assert_eq!(registry.provider_names::<SearchCapability>(), vec!["database", "null"]);
}

#[tokio::test]
async fn test_defaults_resolve_every_capability() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = ServiceRoot::new(config_in(&dir), registry()).expect("defaults are valid");
    let scope = root.create_scope();

    assert_eq!(scope.get::<ContextCapability>().await.expect("context").provider_name(), "memory");
    assert_eq!(scope.get::<DatabaseCapability>().await.expect("database").provider_name(), "memory");
    assert_eq!(scope.get::<StorageCapability>().await.expect("storage").provider_name(), "file");
    assert_eq!(scope.get::<SearchCapability>().await.expect("search").provider_name(), "database");
    assert_eq!(
        scope.get::<SearchIndexerCapability>().await.expect("indexer").provider_name(),
        "null"
    );
    assert!(dir.path().join("blobs").is_dir());
}

#[tokio::test]
async fn test_filesystem_alias_selects_file_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(&dir);
    config.storage.kind = "FileSystem".to_string();

    let root = ServiceRoot::new(config, registry()).expect("valid");
    let storage = root.create_scope().get::<StorageCapability>().await.expect("storage");
    assert_eq!(storage.provider_name(), "file");
}

#[tokio::test]
async fn test_unknown_search_type_names_registered_providers() {
    let mut config = FeedConfig::default();
    config.search.kind = "unknown".to_string();

    let root = ServiceRoot::new(config, registry()).expect("valid");
    let err = root
        .create_scope()
        .get::<SearchCapability>()
        .await
        .err()
        .expect("no search backend");

    assert!(matches!(err, Error::NoProvider { capability: "search", .. }));
    let message = err.to_string();
    assert!(message.contains("search"));
    assert!(message.contains("database, null"));
}

#[test]
fn test_json_catalog_requires_connection_string() {
    let mut config = FeedConfig::default();
    config.database.kind = "json".to_string();
    config.storage.path = Some(PathBuf::new());

    let err = ServiceRoot::new(config, registry()).err().expect("invalid");
    let settings: Vec<_> = err
        .validation_failures()
        .iter()
        .map(|f| f.setting.as_str())
        .collect();
    assert_eq!(settings, vec!["database.connection_string", "storage.path"]);
}

#[tokio::test]
async fn test_json_catalog_is_shared_within_scope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = dir.path().join("catalog.json");
    let mut config = config_in(&dir);
    config.database.kind = "json".to_string();
    config.database.connection_string = Some(catalog.display().to_string());

    let root = ServiceRoot::new(config, registry()).expect("valid");
    let scope = root.create_scope();
    let database = scope.get::<DatabaseCapability>().await.expect("database");
    let search = scope.get::<SearchCapability>().await.expect("search");

    database
        .add(Package::new("Dapper", "2.1.28").with_description("Micro ORM"))
        .await
        .expect("add");
    let response = search.search(&SearchRequest::new("orm")).await.expect("search");
    assert_eq!(response.total_hits, 1);
    assert!(catalog.exists());

    let next = root.create_scope();
    let reloaded = next.get::<DatabaseCapability>().await.expect("database");
    assert!(reloaded.exists("dapper", "2.1.28").await.expect("exists"));
}
