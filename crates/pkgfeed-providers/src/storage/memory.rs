//! In-process blob storage

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pkgfeed_application::registry::{CapabilityProvider, Dependencies, StorageCapability};
use pkgfeed_domain::error::Result;
use pkgfeed_domain::ports::StorageService;
use pkgfeed_domain::value_objects::{FeedConfig, StoragePutResult};

use crate::constants::STORAGE_TYPE_MEMORY;

/// Blobs kept in a concurrent map; lost on restart
#[derive(Clone, Default)]
pub struct MemoryStorageService {
    blobs: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStorageService {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl StorageService for MemoryStorageService {
    fn provider_name(&self) -> &str {
        STORAGE_TYPE_MEMORY
    }

    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(path).map(|blob| blob.value().clone()))
    }

    async fn put(&self, path: &str, content: &[u8]) -> Result<StoragePutResult> {
        Ok(match self.blobs.entry(path.to_string()) {
            Entry::Occupied(existing) if existing.get().as_slice() == content => {
                StoragePutResult::AlreadyExists
            }
            Entry::Occupied(_) => StoragePutResult::Conflict,
            Entry::Vacant(slot) => {
                slot.insert(content.to_vec());
                StoragePutResult::Success
            }
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.blobs.remove(path);
        Ok(())
    }
}

/// Provider of [`MemoryStorageService`]; every build shares one map
#[derive(Default)]
pub struct MemoryStorageProvider {
    shared: MemoryStorageService,
}

impl MemoryStorageProvider {
    /// Create the provider with empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CapabilityProvider for MemoryStorageProvider {
    type Capability = StorageCapability;

    fn name(&self) -> &'static str {
        STORAGE_TYPE_MEMORY
    }

    fn description(&self) -> &'static str {
        "In-process blob storage, cleared on restart"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.storage.is_type(STORAGE_TYPE_MEMORY)
    }

    async fn build(&self, _deps: &Dependencies<'_>) -> Result<Arc<dyn StorageService>> {
        Ok(Arc::new(self.shared.clone()))
    }
}
