//! Package database over the scoped catalog context

use std::sync::Arc;

use async_trait::async_trait;
use pkgfeed_application::registry::{
    Capability, CapabilityProvider, ContextCapability, DatabaseCapability, Dependencies,
};
use pkgfeed_domain::error::Result;
use pkgfeed_domain::ports::{PackageContext, PackageDatabase};
use pkgfeed_domain::value_objects::{FeedConfig, Package, PackageAddResult};
use tracing::debug;

/// Package-level operations, each saved as one unit of work
pub struct CatalogPackageDatabase {
    context: Arc<dyn PackageContext>,
}

impl CatalogPackageDatabase {
    /// Create a database over `context`
    pub fn new(context: Arc<dyn PackageContext>) -> Self {
        Self { context }
    }

    async fn set_listed(&self, id: &str, version: &str, listed: bool) -> Result<bool> {
        let Some(mut package) = self.find_one(id, version).await? else {
            return Ok(false);
        };
        if package.listed != listed {
            package.listed = listed;
            self.context.upsert(package).await?;
            self.context.save_changes().await?;
        }
        Ok(true)
    }
}

#[async_trait]
impl PackageDatabase for CatalogPackageDatabase {
    fn provider_name(&self) -> &str {
        self.context.provider_name()
    }

    async fn add(&self, package: Package) -> Result<PackageAddResult> {
        if self.exists(&package.id, &package.version).await? {
            return Ok(PackageAddResult::PackageAlreadyExists);
        }
        debug!(id = %package.id, version = %package.version, "Adding package to catalog");
        self.context.upsert(package).await?;
        self.context.save_changes().await?;
        Ok(PackageAddResult::Success)
    }

    async fn replace(&self, package: Package) -> Result<()> {
        debug!(id = %package.id, version = %package.version, "Replacing package in catalog");
        self.context.upsert(package).await?;
        self.context.save_changes().await
    }

    async fn exists(&self, id: &str, version: &str) -> Result<bool> {
        Ok(self.find_one(id, version).await?.is_some())
    }

    async fn find(&self, id: &str, include_unlisted: bool) -> Result<Vec<Package>> {
        let mut versions = self.context.versions(id).await?;
        if !include_unlisted {
            versions.retain(|p| p.listed);
        }
        versions.sort_by_key(|p| p.published);
        Ok(versions)
    }

    async fn find_one(&self, id: &str, version: &str) -> Result<Option<Package>> {
        Ok(self
            .context
            .versions(id)
            .await?
            .into_iter()
            .find(|p| p.is(id, version)))
    }

    async fn unlist(&self, id: &str, version: &str) -> Result<bool> {
        self.set_listed(id, version, false).await
    }

    async fn relist(&self, id: &str, version: &str) -> Result<bool> {
        self.set_listed(id, version, true).await
    }

    async fn hard_delete(&self, id: &str, version: &str) -> Result<bool> {
        let removed = self.context.remove(id, version).await?;
        if removed {
            self.context.save_changes().await?;
        }
        Ok(removed)
    }
}

/// Provider of [`CatalogPackageDatabase`]
///
/// Applies to every snapshot: the catalog backend is chosen by the context
/// providers, this one only layers package operations on top.
#[derive(Debug, Default)]
pub struct CatalogDatabaseProvider;

impl CatalogDatabaseProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CapabilityProvider for CatalogDatabaseProvider {
    type Capability = DatabaseCapability;

    fn name(&self) -> &'static str {
        "catalog"
    }

    fn description(&self) -> &'static str {
        "Package database over the scoped catalog context"
    }

    fn is_active(&self, _config: &FeedConfig) -> bool {
        true
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![ContextCapability::NAME]
    }

    async fn build(&self, deps: &Dependencies<'_>) -> Result<Arc<dyn PackageDatabase>> {
        let context = deps.get::<ContextCapability>().await?;
        Ok(Arc::new(CatalogPackageDatabase::new(context)))
    }
}
