//! Blob storage port

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::StoragePutResult;

/// Storage for package content and other blobs, addressed by relative path
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Name of the backend serving this storage
    fn provider_name(&self) -> &str;

    /// Read a blob; `None` when nothing is stored at `path`
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Write a blob unless one is already stored at `path`
    async fn put(&self, path: &str, content: &[u8]) -> Result<StoragePutResult>;

    /// Remove a blob; missing blobs are not an error
    async fn delete(&self, path: &str) -> Result<()>;
}
