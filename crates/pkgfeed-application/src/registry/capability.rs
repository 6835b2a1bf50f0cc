//! Capability definitions
//!
//! A capability is a swappable subsystem role. Each one is a zero-sized marker
//! type tying a stable name to the port trait its providers implement.

use pkgfeed_domain::ports::{
    PackageContext, PackageDatabase, SearchIndexer, SearchService, StorageService,
};
use pkgfeed_domain::value_objects::Lifetime;

/// A swappable subsystem role
pub trait Capability: Send + Sync + 'static {
    /// Port implemented by every provider of this capability
    type Service: ?Sized + Send + Sync + 'static;

    /// Stable identifier used in errors, logs and lifetime overrides
    const NAME: &'static str;

    /// Lifetime applied when the configuration does not override it
    const DEFAULT_LIFETIME: Lifetime;
}

/// Catalog unit of work, shared by everything in one scope
#[derive(Debug, Clone, Copy)]
pub struct ContextCapability;

impl Capability for ContextCapability {
    type Service = dyn PackageContext;
    const NAME: &'static str = "context";
    const DEFAULT_LIFETIME: Lifetime = Lifetime::Scoped;
}

/// Package database
#[derive(Debug, Clone, Copy)]
pub struct DatabaseCapability;

impl Capability for DatabaseCapability {
    type Service = dyn PackageDatabase;
    const NAME: &'static str = "database";
    const DEFAULT_LIFETIME: Lifetime = Lifetime::Transient;
}

/// Blob storage
#[derive(Debug, Clone, Copy)]
pub struct StorageCapability;

impl Capability for StorageCapability {
    type Service = dyn StorageService;
    const NAME: &'static str = "storage";
    const DEFAULT_LIFETIME: Lifetime = Lifetime::Transient;
}

/// Search queries
#[derive(Debug, Clone, Copy)]
pub struct SearchCapability;

impl Capability for SearchCapability {
    type Service = dyn SearchService;
    const NAME: &'static str = "search";
    const DEFAULT_LIFETIME: Lifetime = Lifetime::Transient;
}

/// Search index updates
#[derive(Debug, Clone, Copy)]
pub struct SearchIndexerCapability;

impl Capability for SearchIndexerCapability {
    type Service = dyn SearchIndexer;
    const NAME: &'static str = "search_indexer";
    const DEFAULT_LIFETIME: Lifetime = Lifetime::Transient;
}
