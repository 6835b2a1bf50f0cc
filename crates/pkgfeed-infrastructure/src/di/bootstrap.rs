//! Composition root
//!
//! ```text
//! AppConfig ──▶ ServiceRoot (validated) ──ArcSwap──▶ AppContext
//!                     │                                  │ begin_scope()
//!             ProviderRegistry                           ▼
//!           (bundled providers)                     Scope ── get::<C>()
//! ```
//!
//! The registry is filled once. A reload validates the new snapshot, builds a
//! fresh resolution root and swaps it in; scopes opened before the swap keep
//! resolving against the root they started with.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use pkgfeed_application::registry::{
    CapabilityListing, DatabaseCapability, ProviderRegistry, Scope, SearchIndexerCapability,
    ServiceRoot, StorageCapability,
};
use pkgfeed_application::use_cases::PackageIndexingService;
use pkgfeed_domain::error::Result;
use tracing::{error, info};

use crate::config::AppConfig;

/// Registry holding every bundled provider in priority order
pub fn default_registry() -> Result<Arc<ProviderRegistry>> {
    let mut registry = ProviderRegistry::new();
    pkgfeed_providers::register_all(&mut registry)?;
    Ok(Arc::new(registry))
}

/// Build the package indexing use case from the backends active in `scope`
pub async fn indexing_service(scope: &Scope) -> Result<PackageIndexingService> {
    Ok(PackageIndexingService::new(
        scope.get::<DatabaseCapability>().await?,
        scope.get::<StorageCapability>().await?,
        scope.get::<SearchIndexerCapability>().await?,
        scope.config().allow_package_overwrites,
    )
    .with_api_key(scope.config().api_key.clone()))
}

/// Application context: the current resolution root plus its configuration
pub struct AppContext {
    registry: Arc<ProviderRegistry>,
    config: ArcSwap<AppConfig>,
    root: ArcSwap<ServiceRoot>,
}

impl AppContext {
    /// Validate `config` against the bundled providers
    pub fn init(config: AppConfig) -> Result<Self> {
        Self::with_registry(config, default_registry()?)
    }

    /// Validate `config` against a caller-supplied registry
    pub fn with_registry(config: AppConfig, registry: Arc<ProviderRegistry>) -> Result<Self> {
        let root = ServiceRoot::new(config.feed.clone(), Arc::clone(&registry))?;
        info!(
            database = %config.feed.database.kind,
            storage = %config.feed.storage.kind,
            search = %config.feed.search.kind,
            "Application context initialized"
        );
        Ok(Self {
            registry,
            config: ArcSwap::from_pointee(config),
            root: ArcSwap::new(root),
        })
    }

    /// Current configuration
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.load_full()
    }

    /// Current resolution root
    pub fn root(&self) -> Arc<ServiceRoot> {
        self.root.load_full()
    }

    /// Provider registry shared by every root
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Open a scope for one unit of work on the current root
    pub fn begin_scope(&self) -> Scope {
        self.root().create_scope()
    }

    /// Swap in a new configuration
    ///
    /// An invalid snapshot is rejected and the current root stays in place.
    pub fn reload(&self, config: AppConfig) -> Result<()> {
        let root = ServiceRoot::new(config.feed.clone(), Arc::clone(&self.registry))
            .inspect_err(|err| error!(error = %err, "Configuration reload rejected"))?;
        self.root.store(root);
        self.config.store(Arc::new(config));
        info!("Configuration reloaded");
        Ok(())
    }

    /// Registered providers, grouped by capability
    pub fn available_providers(&self) -> AvailableProviders {
        AvailableProviders(self.registry.describe())
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("registry", &self.registry)
            .field("root", &self.root())
            .finish()
    }
}

/// Registered providers, printable as a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableProviders(pub Vec<CapabilityListing>);

impl fmt::Display for AvailableProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for listing in &self.0 {
            write!(f, "{listing}")?;
        }
        Ok(())
    }
}
