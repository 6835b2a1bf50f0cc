//! JSON file catalog
//!
//! Each context loads the catalog file when it is built and works on its own
//! copy. Changes reach the file on [`PackageContext::save_changes`]; a scope
//! that never saves leaves the file untouched. The last save wins when two
//! scopes change the catalog concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use pkgfeed_application::registry::{
    CapabilityProvider, ContextCapability, Dependencies, ValidationReport,
};
use pkgfeed_domain::error::{Error, Result};
use pkgfeed_domain::ports::PackageContext;
use pkgfeed_domain::value_objects::{FeedConfig, Package};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::{catalog_key, upsert_version};
use crate::constants::DATABASE_TYPE_JSON;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    packages: Vec<Package>,
}

/// Unit of work over a JSON catalog file
pub struct JsonPackageContext {
    path: PathBuf,
    packages: Mutex<Vec<Package>>,
    dirty: AtomicBool,
}

impl JsonPackageContext {
    /// Load the catalog at `path`; a missing file is an empty catalog
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let catalog = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<CatalogFile>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CatalogFile::default(),
            Err(e) => {
                return Err(Error::io_with_source(
                    format!("Failed to read catalog {}", path.display()),
                    e,
                ));
            }
        };

        debug!(path = %path.display(), packages = catalog.packages.len(), "Loaded JSON catalog");
        Ok(Self {
            path,
            packages: Mutex::new(catalog.packages),
            dirty: AtomicBool::new(false),
        })
    }

    /// Catalog file backing this context
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, packages: &[Package]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::io_with_source(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string_pretty(&CatalogFile {
            packages: packages.to_vec(),
        })?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            Error::io_with_source(format!("Failed to write catalog {}", self.path.display()), e)
        })
    }
}

#[async_trait]
impl PackageContext for JsonPackageContext {
    fn provider_name(&self) -> &str {
        DATABASE_TYPE_JSON
    }

    async fn versions(&self, id: &str) -> Result<Vec<Package>> {
        let key = catalog_key(id);
        let packages = self.packages.lock().await;
        Ok(packages
            .iter()
            .filter(|p| catalog_key(&p.id) == key)
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Package>> {
        Ok(self.packages.lock().await.clone())
    }

    async fn upsert(&self, package: Package) -> Result<()> {
        upsert_version(&mut *self.packages.lock().await, package);
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }

    async fn remove(&self, id: &str, version: &str) -> Result<bool> {
        let mut packages = self.packages.lock().await;
        let before = packages.len();
        packages.retain(|p| !p.is(id, version));
        let removed = packages.len() != before;
        if removed {
            self.dirty.store(true, Ordering::Release);
        }
        Ok(removed)
    }

    async fn save_changes(&self) -> Result<()> {
        let packages = self.packages.lock().await;
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        if let Err(e) = self.write(&packages).await {
            self.dirty.store(true, Ordering::Release);
            return Err(e);
        }
        debug!(path = %self.path.display(), packages = packages.len(), "Saved JSON catalog");
        Ok(())
    }
}

/// Provider of the JSON file catalog (`database.type = "json"`)
///
/// `database.connection_string` is the catalog file path.
#[derive(Debug, Default)]
pub struct JsonContextProvider;

impl JsonContextProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CapabilityProvider for JsonContextProvider {
    type Capability = ContextCapability;

    fn name(&self) -> &'static str {
        DATABASE_TYPE_JSON
    }

    fn description(&self) -> &'static str {
        "JSON file catalog saved per unit of work"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.database.is_type(DATABASE_TYPE_JSON)
    }

    fn validate(&self, config: &FeedConfig, report: &mut ValidationReport) {
        report.require_non_empty(
            "database.connection_string",
            config.database.connection_string.as_deref(),
        );
    }

    async fn build(&self, deps: &Dependencies<'_>) -> Result<Arc<dyn PackageContext>> {
        let path = deps
            .config()
            .database
            .connection_string
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::configuration("database.connection_string is not set"))?;
        Ok(Arc::new(JsonPackageContext::open(path).await?))
    }
}
