//! Selection report tests

use pkgfeed_domain::value_objects::{Lifetime, StorageOptions};
use pkgfeed_infrastructure::config::ConfigBuilder;
use pkgfeed_infrastructure::di::{AppContext, diagnose};

#[test]
fn test_report_names_selected_providers() {
    let config = ConfigBuilder::new()
        .with_storage(StorageOptions {
            kind: "memory".to_string(),
            path: None,
        })
        .with_lifetime("storage", Lifetime::Singleton)
        .build();
    let context = AppContext::init(config).expect("valid config");

    let report = diagnose(&context.root());
    assert!(report.is_healthy());
    assert_eq!(report.entries.len(), 5);

    let storage = report.entry("storage").expect("storage entry");
    assert_eq!(storage.provider, Ok("memory"));
    assert_eq!(storage.lifetime, Lifetime::Singleton);

    let context_entry = report.entry("context").expect("context entry");
    assert_eq!(context_entry.lifetime, Lifetime::Scoped);
    assert_eq!(report.entry("search_indexer").expect("indexer").provider, Ok("null"));

    let rendered = report.to_string();
    assert!(rendered.contains("database"));
    assert!(!rendered.contains("ERROR"));
    assert_eq!(context.root().singleton_count(), 0);
}

#[test]
fn test_unknown_backend_makes_report_unhealthy() {
    let mut config = ConfigBuilder::new()
        .with_storage(StorageOptions {
            kind: "memory".to_string(),
            path: None,
        })
        .build();
    config.feed.search.kind = "elastic".to_string();

    // Unknown types pass validation and only fail at selection
    let context = AppContext::init(config).expect("snapshot itself is valid");
    let report = diagnose(&context.root());

    assert!(!report.is_healthy());
    let search = report.entry("search").expect("search entry");
    let reason = search.provider.as_ref().expect_err("no search provider");
    assert!(reason.contains("database, null"));
    assert!(report.to_string().contains("ERROR"));
}
