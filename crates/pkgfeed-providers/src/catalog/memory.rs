//! In-memory catalog
//!
//! Every context built by one provider shares the same store, so packages
//! outlive the scope that added them for as long as the process runs.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use pkgfeed_application::registry::{CapabilityProvider, ContextCapability, Dependencies};
use pkgfeed_domain::error::Result;
use pkgfeed_domain::ports::PackageContext;
use pkgfeed_domain::value_objects::{FeedConfig, Package};

use super::{catalog_key, upsert_version};
use crate::constants::DATABASE_TYPE_MEMORY;

type CatalogStore = Arc<DashMap<String, Vec<Package>>>;

/// Context over a process-wide package map
///
/// Changes are visible immediately; [`PackageContext::save_changes`] has
/// nothing to flush.
#[derive(Clone, Default)]
pub struct MemoryPackageContext {
    packages: CatalogStore,
}

impl MemoryPackageContext {
    /// Create a context over an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PackageContext for MemoryPackageContext {
    fn provider_name(&self) -> &str {
        DATABASE_TYPE_MEMORY
    }

    async fn versions(&self, id: &str) -> Result<Vec<Package>> {
        Ok(self
            .packages
            .get(&catalog_key(id))
            .map(|versions| versions.value().clone())
            .unwrap_or_default())
    }

    async fn all(&self) -> Result<Vec<Package>> {
        Ok(self
            .packages
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect())
    }

    async fn upsert(&self, package: Package) -> Result<()> {
        let mut versions = self.packages.entry(catalog_key(&package.id)).or_default();
        upsert_version(&mut versions, package);
        Ok(())
    }

    async fn remove(&self, id: &str, version: &str) -> Result<bool> {
        let key = catalog_key(id);
        let removed = match self.packages.get_mut(&key) {
            Some(mut versions) => {
                let before = versions.len();
                versions.retain(|p| !p.is(id, version));
                versions.len() != before
            }
            None => false,
        };
        self.packages.remove_if(&key, |_, versions| versions.is_empty());
        Ok(removed)
    }

    async fn save_changes(&self) -> Result<()> {
        Ok(())
    }
}

/// Provider of the in-memory catalog (`database.type = "memory"`)
#[derive(Default)]
pub struct MemoryContextProvider {
    shared: MemoryPackageContext,
}

impl MemoryContextProvider {
    /// Create a provider with an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CapabilityProvider for MemoryContextProvider {
    type Capability = ContextCapability;

    fn name(&self) -> &'static str {
        DATABASE_TYPE_MEMORY
    }

    fn description(&self) -> &'static str {
        "In-memory catalog shared by the whole process"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.database.is_type(DATABASE_TYPE_MEMORY)
    }

    async fn build(&self, _deps: &Dependencies<'_>) -> Result<Arc<dyn PackageContext>> {
        Ok(Arc::new(self.shared.clone()))
    }
}
