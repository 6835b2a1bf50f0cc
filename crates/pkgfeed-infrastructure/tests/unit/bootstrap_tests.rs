//! Application context tests

use std::sync::Arc;

use pkgfeed_application::registry::{SearchCapability, StorageCapability};
use pkgfeed_application::use_cases::{PackageIndexingResult, PackageUpload};
use pkgfeed_domain::error::Error;
use pkgfeed_domain::value_objects::{Package, SearchOptions, SearchRequest, StorageOptions};
use pkgfeed_infrastructure::config::{AppConfig, ConfigBuilder};
use pkgfeed_infrastructure::di::{AppContext, indexing_service};

fn memory_config() -> AppConfig {
    ConfigBuilder::new()
        .with_storage(StorageOptions {
            kind: "memory".to_string(),
            path: None,
        })
        .build()
}

fn with_search(config: &AppConfig, kind: &str) -> AppConfig {
    let mut config = config.clone();
    config.feed.search = SearchOptions {
        kind: kind.to_string(),
        ..SearchOptions::default()
    };
    config
}

fn upload(id: &str, version: &str) -> PackageUpload {
    PackageUpload::new(
        Package::new(id, version).with_description("Test package"),
        b"package bytes".to_vec(),
    )
}

#[tokio::test]
async fn test_init_resolves_configured_backends() {
    let context = AppContext::init(memory_config()).expect("valid config");
    let scope = context.begin_scope();

    let storage = scope.get::<StorageCapability>().await.expect("storage");
    assert_eq!(storage.provider_name(), "memory");
    assert_eq!(context.config().feed.storage.kind, "memory");
}

#[test]
fn test_init_rejects_invalid_snapshot() {
    let mut config = memory_config();
    config.feed.database.kind = "json".to_string();

    let err = AppContext::init(config).expect_err("json catalog needs a path");
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(err.validation_failures()[0].setting, "database.connection_string");
}

#[tokio::test]
async fn test_push_then_search_through_context() {
    let context = AppContext::init(memory_config()).expect("valid config");
    let scope = context.begin_scope();
    let indexer = indexing_service(&scope).await.expect("indexing service");

    let result = indexer.index(upload("Reload.Sample", "1.0.0")).await.expect("index");
    assert_eq!(result, PackageIndexingResult::Success);

    let search = scope.get::<SearchCapability>().await.expect("search");
    let response = search.search(&SearchRequest::new("reload")).await.expect("search");
    assert_eq!(response.total_hits, 1);
}

#[tokio::test]
async fn test_reload_swaps_root_for_new_scopes_only() {
    let context = AppContext::init(memory_config()).expect("valid config");
    let before = context.begin_scope();
    let old_root = context.root();

    context
        .reload(with_search(&memory_config(), "null"))
        .expect("valid reload");

    assert!(!Arc::ptr_eq(&old_root, &context.root()));
    assert_eq!(context.config().feed.search.kind, "null");

    let old_search = before.get::<SearchCapability>().await.expect("old search");
    assert_eq!(old_search.provider_name(), "database");

    let after = context.begin_scope();
    let new_search = after.get::<SearchCapability>().await.expect("new search");
    assert_eq!(new_search.provider_name(), "null");
}

#[tokio::test]
async fn test_invalid_reload_keeps_current_root() {
    let context = AppContext::init(memory_config()).expect("valid config");
    let root = context.root();

    let mut invalid = memory_config();
    invalid.feed.database.kind = "json".to_string();
    let err = context.reload(invalid).expect_err("json catalog needs a path");
    assert!(err.is_fatal());

    assert!(Arc::ptr_eq(&root, &context.root()));
    assert_eq!(context.config().feed.database.kind, "memory");
}

#[test]
fn test_available_providers_lists_every_capability() {
    let context = AppContext::init(memory_config()).expect("valid config");
    let listing = context.available_providers();

    let capabilities: Vec<_> = listing.0.iter().map(|l| l.capability).collect();
    assert_eq!(
        capabilities,
        vec!["context", "database", "storage", "search", "search_indexer"]
    );
    let rendered = listing.to_string();
    assert!(rendered.contains("storage:"));
    assert!(rendered.contains("  - memory:"));
}
