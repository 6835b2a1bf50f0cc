//! Null search backends
//!
//! Search returns nothing and indexing does nothing. The indexer also serves
//! catalog search, which reads the catalog directly and needs no index.

use std::sync::Arc;

use async_trait::async_trait;
use pkgfeed_application::registry::{
    CapabilityProvider, Dependencies, SearchCapability, SearchIndexerCapability,
};
use pkgfeed_domain::error::Result;
use pkgfeed_domain::ports::{SearchIndexer, SearchService};
use pkgfeed_domain::value_objects::{FeedConfig, Package, SearchRequest, SearchResponse};

use crate::constants::{SEARCH_TYPE_DATABASE, SEARCH_TYPE_NULL};

/// Search service that never finds anything
#[derive(Debug, Clone, Default)]
pub struct NullSearchService;

#[async_trait]
impl SearchService for NullSearchService {
    fn provider_name(&self) -> &str {
        SEARCH_TYPE_NULL
    }

    async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse> {
        Ok(SearchResponse::default())
    }
}

/// Indexer that accepts and discards every package
#[derive(Debug, Clone, Default)]
pub struct NullSearchIndexer;

#[async_trait]
impl SearchIndexer for NullSearchIndexer {
    fn provider_name(&self) -> &str {
        SEARCH_TYPE_NULL
    }

    async fn index(&self, _package: &Package) -> Result<()> {
        Ok(())
    }
}

/// Provider of [`NullSearchService`] (`search.type = "null"`)
#[derive(Debug, Default)]
pub struct NullSearchProvider;

#[async_trait]
impl CapabilityProvider for NullSearchProvider {
    type Capability = SearchCapability;

    fn name(&self) -> &'static str {
        SEARCH_TYPE_NULL
    }

    fn description(&self) -> &'static str {
        "Search disabled; every query is empty"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.search.is_type(SEARCH_TYPE_NULL)
    }

    async fn build(&self, _deps: &Dependencies<'_>) -> Result<Arc<dyn SearchService>> {
        Ok(Arc::new(NullSearchService))
    }
}

/// Provider of [`NullSearchIndexer`] (`search.type` is `database` or `null`)
#[derive(Debug, Default)]
pub struct NullSearchIndexerProvider;

#[async_trait]
impl CapabilityProvider for NullSearchIndexerProvider {
    type Capability = SearchIndexerCapability;

    fn name(&self) -> &'static str {
        SEARCH_TYPE_NULL
    }

    fn description(&self) -> &'static str {
        "No-op indexer for backends that need no index"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.search.is_type(SEARCH_TYPE_DATABASE) || config.search.is_type(SEARCH_TYPE_NULL)
    }

    async fn build(&self, _deps: &Dependencies<'_>) -> Result<Arc<dyn SearchIndexer>> {
        Ok(Arc::new(NullSearchIndexer))
    }
}
