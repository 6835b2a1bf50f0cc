//! Tests for lifetimes, scopes and concurrent construction

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use pkgfeed_application::registry::{
    ContextCapability, DatabaseCapability, ProviderRegistry, SearchCapability, ServiceRoot,
    StorageCapability,
};
use pkgfeed_domain::error::Error;
use pkgfeed_domain::value_objects::{FeedConfig, Lifetime, Package, PackageAddResult};
use tokio_util::sync::CancellationToken;

use crate::test_utils::{
    CyclicIndexerProvider, CyclicSearchProvider, FakeContextProvider, FakeDatabaseProvider,
    FakeStorageProvider, UndeclaredContextSearchProvider, count, root, storage_config,
};

fn with_lifetime(mut config: FeedConfig, capability: &str, lifetime: Lifetime) -> FeedConfig {
    config
        .resolution
        .lifetimes
        .insert(capability.to_string(), lifetime);
    config
}

#[tokio::test]
async fn test_scoped_instance_is_shared_within_scope() {
    let provider = FakeContextProvider::default();
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let root = root(FeedConfig::default(), registry);
    let scope = root.create_scope();
    let first = scope.get::<ContextCapability>().await.expect("builds");
    let second = scope.get::<ContextCapability>().await.expect("cached");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(count(&builds), 1);
    assert_eq!(scope.cached_count(), 1);
}

#[tokio::test]
async fn test_scopes_do_not_share_scoped_instances() {
    let provider = FakeContextProvider::default();
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let root = root(FeedConfig::default(), registry);
    let a = root.create_scope();
    let b = root.create_scope();
    let from_a = a.get::<ContextCapability>().await.expect("builds");
    let from_b = b.get::<ContextCapability>().await.expect("builds");

    assert!(!Arc::ptr_eq(&from_a, &from_b));
    assert_ne!(a.id(), b.id());
    assert_eq!(count(&builds), 2);
}

#[tokio::test]
async fn test_transient_instances_are_rebuilt() {
    let provider = FakeStorageProvider::new("memory", "memory");
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let root = root(storage_config("memory"), registry);
    let scope = root.create_scope();
    let first = scope.get::<StorageCapability>().await.expect("builds");
    let second = scope.get::<StorageCapability>().await.expect("builds");

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(count(&builds), 2);
    assert_eq!(scope.cached_count(), 0);
}

#[tokio::test]
async fn test_singleton_override_shares_across_scopes() {
    let provider = FakeStorageProvider::new("memory", "memory");
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let config = with_lifetime(storage_config("memory"), "storage", Lifetime::Singleton);
    let root = root(config, registry);
    assert_eq!(root.lifetime_of::<StorageCapability>(), Lifetime::Singleton);

    let a = root.create_scope().get::<StorageCapability>().await.expect("builds");
    let b = root.create_scope().get::<StorageCapability>().await.expect("cached");

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(count(&builds), 1);
    assert_eq!(root.singleton_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scoped_requests_build_once() {
    let provider = FakeContextProvider::with_delay(Duration::from_millis(50));
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let root = root(FeedConfig::default(), registry);
    let scope = root.create_scope();
    let results = join_all((0..16).map(|_| scope.get::<ContextCapability>())).await;

    let instances: Vec<_> = results
        .into_iter()
        .map(|r| r.expect("builds"))
        .collect();
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    assert_eq!(count(&builds), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_singleton_requests_from_tasks_build_once() {
    let provider = FakeStorageProvider::new("memory", "memory").with_delay(Duration::from_millis(50));
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let config = with_lifetime(storage_config("memory"), "storage", Lifetime::Singleton);
    let root = root(config, registry);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = Arc::clone(&root);
            tokio::spawn(async move { root.create_scope().get::<StorageCapability>().await })
        })
        .collect();

    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await.expect("task joins").expect("builds"));
    }
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    assert_eq!(count(&builds), 1);
}

#[tokio::test]
async fn test_failed_construction_is_not_cached() {
    let provider = FakeStorageProvider::new("memory", "memory").failing();
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let config = with_lifetime(storage_config("memory"), "storage", Lifetime::Scoped);
    let root = root(config, registry);
    let scope = root.create_scope();

    assert!(scope.get::<StorageCapability>().await.is_err());
    assert!(scope.get::<StorageCapability>().await.is_err());
    assert_eq!(count(&builds), 2);
    assert_eq!(scope.cached_count(), 0);
}

#[tokio::test]
async fn test_cancelled_scope_abandons_construction() {
    let provider = FakeContextProvider::with_delay(Duration::from_secs(30));
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let root = root(FeedConfig::default(), registry);
    let token = CancellationToken::new();
    let scope = root.create_scope().with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
    });

    let err = scope
        .get::<ContextCapability>()
        .await
        .err()
        .expect("construction is cancelled");
    canceller.await.expect("canceller joins");

    assert!(matches!(
        err,
        Error::Cancelled {
            capability: "context"
        }
    ));
    assert_eq!(scope.cached_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_construction_timeout() {
    let provider = FakeContextProvider::with_delay(Duration::from_secs(120));
    let builds = provider.builds();
    let mut registry = ProviderRegistry::new();
    registry.register(provider).expect("registration succeeds");

    let mut config = FeedConfig::default();
    config.resolution.construction_timeout_secs = Some(5);
    let root = root(config, registry);
    let scope = root.create_scope();

    let err = scope
        .get::<ContextCapability>()
        .await
        .err()
        .expect("construction times out");
    match err {
        Error::Timeout { capability, after } => {
            assert_eq!(capability, "context");
            assert_eq!(after, Duration::from_secs(5));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count(&builds), 1);
    assert_eq!(scope.cached_count(), 0);
}

#[tokio::test]
async fn test_dependencies_share_scoped_context() {
    let context = FakeContextProvider::default();
    let context_builds = context.builds();
    let database = FakeDatabaseProvider::default();
    let database_builds = database.builds();

    let mut registry = ProviderRegistry::new();
    registry
        .register(context)
        .and_then(|r| r.register(database))
        .expect("registration succeeds");

    let root = root(FeedConfig::default(), registry);
    let scope = root.create_scope();

    let writer = scope.get::<DatabaseCapability>().await.expect("builds");
    let reader = scope.get::<DatabaseCapability>().await.expect("builds");
    assert_eq!(
        writer
            .add(Package::new("Serilog", "3.1.0"))
            .await
            .expect("add succeeds"),
        PackageAddResult::Success
    );

    assert!(reader.exists("serilog", "3.1.0").await.expect("query succeeds"));
    assert_eq!(count(&database_builds), 2);
    assert_eq!(count(&context_builds), 1);

    let other = root.create_scope().get::<DatabaseCapability>().await.expect("builds");
    assert!(!other.exists("serilog", "3.1.0").await.expect("query succeeds"));
}

#[tokio::test]
async fn test_singleton_does_not_capture_caller_scope() {
    let context = FakeContextProvider::default();
    let context_builds = context.builds();
    let mut registry = ProviderRegistry::new();
    registry
        .register(context)
        .and_then(|r| r.register(FakeDatabaseProvider::default()))
        .expect("registration succeeds");

    let config = with_lifetime(FeedConfig::default(), "database", Lifetime::Singleton);
    let root = root(config, registry);
    let scope = root.create_scope();

    let scoped_context = scope.get::<ContextCapability>().await.expect("builds");
    let _database = scope.get::<DatabaseCapability>().await.expect("builds");

    assert_eq!(count(&context_builds), 2);
    assert_eq!(scope.cached_count(), 1);
    assert!(Arc::strong_count(&scoped_context) >= 2);
}

fn cyclic_registry() -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    registry
        .register(CyclicSearchProvider)
        .and_then(|r| r.register(CyclicIndexerProvider))
        .expect("registration succeeds");
    Arc::new(registry)
}

fn assert_cycle_rejected(config: FeedConfig) {
    let err = ServiceRoot::new(config, cyclic_registry())
        .err()
        .expect("cycle is rejected");

    match &err {
        Error::DependencyCycle { chain } => {
            assert_eq!(chain, &vec!["search", "search_indexer", "search"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_fatal());
}

#[test]
fn test_dependency_cycle_is_rejected_before_resolution() {
    assert_cycle_rejected(FeedConfig::default());
}

#[test]
fn test_singleton_cycle_is_rejected() {
    let config = with_lifetime(FeedConfig::default(), "search", Lifetime::Singleton);
    assert_cycle_rejected(with_lifetime(config, "search_indexer", Lifetime::Singleton));
}

#[test]
fn test_scoped_cycle_is_rejected() {
    let config = with_lifetime(FeedConfig::default(), "search", Lifetime::Scoped);
    assert_cycle_rejected(with_lifetime(config, "search_indexer", Lifetime::Scoped));
}

#[test]
fn test_one_sided_dependency_does_not_block_root() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(CyclicSearchProvider)
        .and_then(|r| r.register(FakeStorageProvider::new("memory", "memory")))
        .expect("registration succeeds");

    assert!(ServiceRoot::new(storage_config("memory"), Arc::new(registry)).is_ok());
}

#[tokio::test]
async fn test_undeclared_dependency_is_refused() {
    let context = FakeContextProvider::default();
    let context_builds = context.builds();
    let mut registry = ProviderRegistry::new();
    registry
        .register(context)
        .and_then(|r| r.register(UndeclaredContextSearchProvider))
        .expect("registration succeeds");

    let root = root(FeedConfig::default(), registry);
    let err = root
        .create_scope()
        .get::<SearchCapability>()
        .await
        .err()
        .expect("undeclared request fails");

    match err.root_cause() {
        Error::UndeclaredDependency {
            capability,
            provider,
            dependency,
        } => {
            assert_eq!(*capability, "search");
            assert_eq!(*provider, "undeclared");
            assert_eq!(*dependency, "context");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.root_cause().is_fatal());
    assert_eq!(count(&context_builds), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_joined_scoped_requests_with_shared_dependency_complete() {
    let context = FakeContextProvider::with_delay(Duration::from_millis(20));
    let context_builds = context.builds();
    let mut registry = ProviderRegistry::new();
    registry
        .register(context)
        .and_then(|r| r.register(FakeDatabaseProvider::default()))
        .expect("registration succeeds");

    let config = with_lifetime(FeedConfig::default(), "database", Lifetime::Scoped);
    let root = root(config, registry);
    let scope = root.create_scope();

    let (database, context) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(
            scope.get::<DatabaseCapability>(),
            scope.get::<ContextCapability>()
        )
    })
    .await
    .expect("requests complete");

    database.expect("database builds");
    context.expect("context builds");
    assert_eq!(count(&context_builds), 1);
    assert_eq!(scope.cached_count(), 2);
}
