//! Search value objects

use serde::{Deserialize, Serialize};

/// Default page size for search requests
pub const DEFAULT_SEARCH_TAKE: usize = 20;

/// A paged search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Text to look for in ids, descriptions and tags; empty matches everything
    pub query: String,
    /// Number of results to skip
    pub skip: usize,
    /// Maximum number of results to return
    pub take: usize,
    /// Whether unlisted versions are considered
    pub include_unlisted: bool,
}

impl SearchRequest {
    /// Create a request for the first page of `query`
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            skip: 0,
            take: DEFAULT_SEARCH_TAKE,
            include_unlisted: false,
        }
    }

    /// Set the page window
    pub fn with_page(mut self, skip: usize, take: usize) -> Self {
        self.skip = skip;
        self.take = take;
        self
    }
}

/// A package id with the versions that matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Package id
    pub id: String,
    /// Most recently published matching version
    pub version: String,
    /// Description of that version
    pub description: String,
    /// All matching versions, oldest first
    pub versions: Vec<String>,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Number of package ids matching before paging
    pub total_hits: usize,
    /// The requested page
    pub data: Vec<SearchResult>,
}
