//! Package indexing use case
//!
//! Accepts an uploaded package, stores its content, records it in the
//! catalog and hands it to the search indexer. Every backend is injected
//! through [`PackageIndexingService::new`]; the service never looks anything
//! up by itself.
//!
//! Content is written before the catalog is touched. A version that is
//! already catalogued is overwritten in one catalog write; if that write
//! fails the previous content is put back and the previous entry stays.
//! Content without a catalog entry is left over from an earlier failed push
//! and gets replaced.

use std::sync::Arc;

use pkgfeed_domain::error::{Error, Result};
use pkgfeed_domain::ports::{PackageDatabase, SearchIndexer, StorageService};
use pkgfeed_domain::value_objects::{Package, PackageAddResult, StoragePutResult};
use tracing::{error, info, warn};

/// An uploaded package: catalog metadata plus content
#[derive(Debug, Clone)]
pub struct PackageUpload {
    /// Catalog metadata
    pub package: Package,
    /// Package content
    pub content: Vec<u8>,
    /// Key presented by the uploader
    pub api_key: Option<String>,
}

impl PackageUpload {
    /// Create an upload
    pub fn new(package: Package, content: Vec<u8>) -> Self {
        Self {
            package,
            content,
            api_key: None,
        }
    }

    /// Present `key` with the upload
    pub fn with_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Outcome of indexing an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageIndexingResult {
    /// The package was stored, catalogued and indexed
    Success,
    /// The version already exists and overwrites are disabled
    PackageAlreadyExists,
    /// The upload is missing an id, a version or content
    InvalidPackage,
    /// The feed requires an API key and the upload did not present it
    Unauthorized,
}

/// Stores, catalogues and indexes uploaded packages
pub struct PackageIndexingService {
    database: Arc<dyn PackageDatabase>,
    storage: Arc<dyn StorageService>,
    indexer: Arc<dyn SearchIndexer>,
    allow_overwrites: bool,
    api_key: Option<String>,
}

impl PackageIndexingService {
    /// Create the service from its collaborators
    pub fn new(
        database: Arc<dyn PackageDatabase>,
        storage: Arc<dyn StorageService>,
        indexer: Arc<dyn SearchIndexer>,
        allow_overwrites: bool,
    ) -> Self {
        Self {
            database,
            storage,
            indexer,
            allow_overwrites,
            api_key: None,
        }
    }

    /// Require `key` on every upload; `None` accepts anonymous pushes
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    fn is_authorized(&self, presented: Option<&str>) -> bool {
        match self.api_key.as_deref() {
            Some(required) => presented == Some(required),
            None => true,
        }
    }

    async fn store_content(&self, path: &str, content: &[u8], catalogued: bool) -> Result<()> {
        if self.storage.put(path, content).await? != StoragePutResult::Conflict {
            return Ok(());
        }
        if !catalogued {
            warn!(path, "Replacing content left without a catalog entry");
        }
        self.storage.delete(path).await?;
        match self.storage.put(path, content).await? {
            StoragePutResult::Conflict => Err(Error::storage(format!(
                "Content at '{path}' changed while it was being replaced"
            ))),
            StoragePutResult::Success | StoragePutResult::AlreadyExists => Ok(()),
        }
    }

    async fn restore_content(&self, path: &str, previous: Option<Vec<u8>>) {
        let Some(previous) = previous else { return };
        let restored = async {
            self.storage.delete(path).await?;
            self.storage.put(path, &previous).await
        };
        if let Err(err) = restored.await {
            error!(path, error = %err, "Failed to restore previous content");
        }
    }

    /// Index an upload
    pub async fn index(&self, upload: PackageUpload) -> Result<PackageIndexingResult> {
        let PackageUpload {
            package,
            content,
            api_key,
        } = upload;
        if !self.is_authorized(api_key.as_deref()) {
            warn!(id = %package.id, version = %package.version, "Rejected push without a valid API key");
            return Ok(PackageIndexingResult::Unauthorized);
        }
        if package.id.trim().is_empty() || package.version.trim().is_empty() || content.is_empty() {
            warn!(id = %package.id, version = %package.version, "Rejected invalid package");
            return Ok(PackageIndexingResult::InvalidPackage);
        }

        let exists = self.database.exists(&package.id, &package.version).await?;
        if exists && !self.allow_overwrites {
            return Ok(PackageIndexingResult::PackageAlreadyExists);
        }

        let path = package.storage_path();
        if exists {
            let previous = self.storage.get(&path).await?;
            self.store_content(&path, &content, true).await?;
            if let Err(err) = self.database.replace(package.clone()).await {
                self.restore_content(&path, previous).await;
                return Err(err);
            }
        } else {
            self.store_content(&path, &content, false).await?;
            if self.database.add(package.clone()).await? == PackageAddResult::PackageAlreadyExists {
                return Ok(PackageIndexingResult::PackageAlreadyExists);
            }
        }

        self.indexer.index(&package).await?;

        info!(
            id = %package.id,
            version = %package.version,
            database = self.database.provider_name(),
            storage = self.storage.provider_name(),
            indexer = self.indexer.provider_name(),
            "Indexed package"
        );
        Ok(PackageIndexingResult::Success)
    }
}
