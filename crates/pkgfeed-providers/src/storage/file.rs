//! Local directory blob storage

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pkgfeed_application::registry::{
    CapabilityProvider, Dependencies, StorageCapability, ValidationReport,
};
use pkgfeed_domain::error::{Error, Result};
use pkgfeed_domain::ports::StorageService;
use pkgfeed_domain::value_objects::{FeedConfig, StoragePutResult};
use tracing::debug;

use crate::constants::{DEFAULT_STORAGE_ROOT, STORAGE_TYPE_FILE, STORAGE_TYPE_FILESYSTEM};

/// Blobs stored as files under a root directory
#[derive(Debug, Clone)]
pub struct FileStorageService {
    root: PathBuf,
}

impl FileStorageService {
    /// Open storage rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            Error::storage_with_source(
                format!("Failed to create storage directory {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a blob path onto the root, refusing anything that escapes it
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        let mut segments = 0usize;

        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    segments += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::invalid_argument(format!(
                        "Storage path '{path}' must stay inside the storage root"
                    )));
                }
            }
        }

        if segments == 0 {
            return Err(Error::invalid_argument("Storage path must not be empty"));
        }
        Ok(resolved)
    }
}

#[async_trait]
impl StorageService for FileStorageService {
    fn provider_name(&self) -> &str {
        STORAGE_TYPE_FILE
    }

    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage_with_source(
                format!("Failed to read {}", file.display()),
                e,
            )),
        }
    }

    async fn put(&self, path: &str, content: &[u8]) -> Result<StoragePutResult> {
        let file = self.resolve(path)?;

        if let Some(existing) = self.get(path).await? {
            return Ok(if existing == content {
                StoragePutResult::AlreadyExists
            } else {
                StoragePutResult::Conflict
            });
        }

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::storage_with_source(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        tokio::fs::write(&file, content).await.map_err(|e| {
            Error::storage_with_source(format!("Failed to write {}", file.display()), e)
        })?;

        debug!(path, bytes = content.len(), "Stored blob");
        Ok(StoragePutResult::Success)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let file = self.resolve(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage_with_source(
                format!("Failed to delete {}", file.display()),
                e,
            )),
        }
    }
}

/// Provider of [`FileStorageService`]
///
/// `storage.path` is the root directory; it defaults to `data` in the working
/// directory.
#[derive(Debug, Default)]
pub struct FileStorageProvider;

impl FileStorageProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CapabilityProvider for FileStorageProvider {
    type Capability = StorageCapability;

    fn name(&self) -> &'static str {
        STORAGE_TYPE_FILE
    }

    fn description(&self) -> &'static str {
        "Blobs stored as files in a local directory"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.storage.is_type(STORAGE_TYPE_FILE) || config.storage.is_type(STORAGE_TYPE_FILESYSTEM)
    }

    fn validate(&self, config: &FeedConfig, report: &mut ValidationReport) {
        if config
            .storage
            .path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            report.fail("storage.path", "must not be empty when set");
        }
    }

    async fn build(&self, deps: &Dependencies<'_>) -> Result<Arc<dyn StorageService>> {
        let root = deps
            .config()
            .storage
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT));
        Ok(Arc::new(FileStorageService::open(root).await?))
    }
}
