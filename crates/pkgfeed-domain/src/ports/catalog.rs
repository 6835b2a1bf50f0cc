//! Catalog ports
//!
//! [`PackageContext`] is the unit of work over the package catalog: changes
//! made through one context become durable on [`PackageContext::save_changes`].
//! [`PackageDatabase`] is the package-level API built on top of a context.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{Package, PackageAddResult};

/// Unit of work over the package catalog
#[async_trait]
pub trait PackageContext: Send + Sync {
    /// Name of the backend serving this context
    fn provider_name(&self) -> &str;

    /// Every version of `id`, in insertion order
    async fn versions(&self, id: &str) -> Result<Vec<Package>>;

    /// Every package version in the catalog
    async fn all(&self) -> Result<Vec<Package>>;

    /// Insert or replace a package version
    async fn upsert(&self, package: Package) -> Result<()>;

    /// Remove a package version; returns whether it existed
    async fn remove(&self, id: &str, version: &str) -> Result<bool>;

    /// Make pending changes durable
    async fn save_changes(&self) -> Result<()>;
}

/// Package-level catalog operations
#[async_trait]
pub trait PackageDatabase: Send + Sync {
    /// Name of the backend serving this database
    fn provider_name(&self) -> &str;

    /// Add a new package version
    async fn add(&self, package: Package) -> Result<PackageAddResult>;

    /// Insert or overwrite a version in a single unit of work
    async fn replace(&self, package: Package) -> Result<()>;

    /// Whether `id`@`version` is in the catalog
    async fn exists(&self, id: &str, version: &str) -> Result<bool>;

    /// Versions of `id`, optionally including unlisted ones
    async fn find(&self, id: &str, include_unlisted: bool) -> Result<Vec<Package>>;

    /// A single version, if present
    async fn find_one(&self, id: &str, version: &str) -> Result<Option<Package>>;

    /// Hide a version from search; returns whether it was found
    async fn unlist(&self, id: &str, version: &str) -> Result<bool>;

    /// Show a version in search again; returns whether it was found
    async fn relist(&self, id: &str, version: &str) -> Result<bool>;

    /// Remove a version from the catalog; returns whether it was found
    async fn hard_delete(&self, id: &str, version: &str) -> Result<bool>;
}
