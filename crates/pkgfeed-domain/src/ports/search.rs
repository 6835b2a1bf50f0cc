//! Search ports

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{Package, SearchRequest, SearchResponse};

/// Query side of search
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Name of the backend serving search
    fn provider_name(&self) -> &str;

    /// Run a paged search
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// Write side of search
#[async_trait]
pub trait SearchIndexer: Send + Sync {
    /// Name of the backend receiving index updates
    fn provider_name(&self) -> &str;

    /// Make a newly added package searchable
    async fn index(&self, package: &Package) -> Result<()>;
}
