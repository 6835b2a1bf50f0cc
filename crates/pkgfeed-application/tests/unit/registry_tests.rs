//! Tests for the provider registry

use pkgfeed_application::registry::{ProviderRegistry, StorageCapability};
use pkgfeed_domain::error::Error;

use crate::test_utils::{FakeContextProvider, FakeStorageProvider, count};

#[test]
fn test_registration_order_is_priority_order() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(FakeStorageProvider::new("file", "file"))
        .and_then(|r| r.register(FakeStorageProvider::new("blob", "blob")))
        .and_then(|r| r.register(FakeStorageProvider::new("memory", "memory")))
        .expect("registration succeeds");

    assert_eq!(
        registry.provider_names::<StorageCapability>(),
        vec!["file", "blob", "memory"]
    );
    assert_eq!(registry.capability_names(), vec!["storage"]);
}

#[test]
fn test_duplicate_provider_name_is_rejected() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(FakeStorageProvider::new("file", "file"))
        .expect("first registration succeeds");

    let err = registry
        .register(FakeStorageProvider::new("file", "filesystem"))
        .err()
        .expect("duplicate must fail");
    assert!(err.to_string().contains("already registered"));
    assert_eq!(registry.provider_names::<StorageCapability>(), vec!["file"]);
}

#[test]
fn test_same_name_allowed_across_capabilities() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(FakeStorageProvider::new("fake", "file"))
        .and_then(|r| r.register(FakeContextProvider::default()))
        .expect("names are unique per capability");

    assert_eq!(registry.capability_names(), vec!["storage", "context"]);
}

#[test]
fn test_registration_closed_after_first_resolution() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(FakeStorageProvider::new("file", "file"))
        .expect("registration succeeds");
    assert!(!registry.is_sealed());

    assert_eq!(registry.providers_for::<StorageCapability>().len(), 1);
    assert!(registry.is_sealed());

    let late = FakeStorageProvider::new("memory", "memory");
    let builds = late.builds();
    let err = registry.register(late).err().expect("late registration fails");
    assert!(matches!(
        err,
        Error::RegistrationClosed {
            capability: "storage"
        }
    ));
    assert!(err.is_fatal());
    assert_eq!(count(&builds), 0);
    assert_eq!(registry.provider_names::<StorageCapability>(), vec!["file"]);
}

#[test]
fn test_capability_without_providers_is_empty() {
    let registry = ProviderRegistry::new();
    assert!(registry.providers_for::<StorageCapability>().is_empty());
    assert!(registry.provider_names::<StorageCapability>().is_empty());
}

#[test]
fn test_describe_lists_providers_in_order() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(FakeStorageProvider::new("file", "file"))
        .and_then(|r| r.register(FakeStorageProvider::new("memory", "memory")))
        .expect("registration succeeds");

    let listing = registry.describe();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].capability, "storage");
    let names: Vec<_> = listing[0].providers.iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["file", "memory"]);

    let rendered = listing[0].to_string();
    assert!(rendered.starts_with("storage:"));
    assert!(rendered.contains("  - memory: Test storage"));
}
