//! Catalog search
//!
//! Case-insensitive substring match over ids, descriptions and tags,
//! grouped by package id. Ids are ordered alphabetically; each result
//! carries its matching versions oldest first.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use pkgfeed_application::registry::{
    Capability, CapabilityProvider, ContextCapability, Dependencies, SearchCapability,
};
use pkgfeed_domain::error::Result;
use pkgfeed_domain::ports::{PackageContext, SearchService};
use pkgfeed_domain::value_objects::{
    FeedConfig, Package, SearchRequest, SearchResponse, SearchResult,
};

use crate::catalog::catalog_key;
use crate::constants::SEARCH_TYPE_DATABASE;

fn matches(package: &Package, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    package.id.to_lowercase().contains(query)
        || package.description.to_lowercase().contains(query)
        || package.tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// Search over the scoped catalog context
pub struct DatabaseSearchService {
    context: Arc<dyn PackageContext>,
}

impl DatabaseSearchService {
    /// Create a search service over `context`
    pub fn new(context: Arc<dyn PackageContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl SearchService for DatabaseSearchService {
    fn provider_name(&self) -> &str {
        SEARCH_TYPE_DATABASE
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let query = request.query.trim().to_lowercase();

        let mut groups: BTreeMap<String, Vec<Package>> = BTreeMap::new();
        for package in self.context.all().await? {
            if (package.listed || request.include_unlisted) && matches(&package, &query) {
                groups.entry(catalog_key(&package.id)).or_default().push(package);
            }
        }

        let total_hits = groups.len();
        let data = groups
            .into_values()
            .skip(request.skip)
            .take(request.take)
            .filter_map(|mut versions| {
                versions.sort_by_key(|p| p.published);
                let latest = versions.last()?;
                Some(SearchResult {
                    id: latest.id.clone(),
                    version: latest.version.clone(),
                    description: latest.description.clone(),
                    versions: versions.iter().map(|p| p.version.clone()).collect(),
                })
            })
            .collect();

        Ok(SearchResponse { total_hits, data })
    }
}

/// Provider of [`DatabaseSearchService`] (`search.type = "database"`)
#[derive(Debug, Default)]
pub struct DatabaseSearchProvider;

impl DatabaseSearchProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CapabilityProvider for DatabaseSearchProvider {
    type Capability = SearchCapability;

    fn name(&self) -> &'static str {
        SEARCH_TYPE_DATABASE
    }

    fn description(&self) -> &'static str {
        "Substring search over the package catalog"
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        config.search.is_type(SEARCH_TYPE_DATABASE)
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![ContextCapability::NAME]
    }

    async fn build(&self, deps: &Dependencies<'_>) -> Result<Arc<dyn SearchService>> {
        let context = deps.get::<ContextCapability>().await?;
        Ok(Arc::new(DatabaseSearchService::new(context)))
    }
}
