//! Package value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single version of a package in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package id (case-insensitive)
    pub id: String,
    /// Version string (case-insensitive)
    pub version: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Package authors
    #[serde(default)]
    pub authors: Vec<String>,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unlisted packages stay downloadable but are hidden from search
    pub listed: bool,
    /// Time the version was published
    pub published: DateTime<Utc>,
}

impl Package {
    /// Create a listed package published now
    pub fn new<I: Into<String>, V: Into<String>>(id: I, version: V) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            description: String::new(),
            authors: Vec::new(),
            tags: Vec::new(),
            listed: true,
            published: Utc::now(),
        }
    }

    /// Set the description
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Set the authors
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Whether this is `id`@`version`, ignoring case
    pub fn is(&self, id: &str, version: &str) -> bool {
        self.id.eq_ignore_ascii_case(id) && self.version.eq_ignore_ascii_case(version)
    }

    /// Blob storage path of the package content
    pub fn storage_path(&self) -> String {
        package_storage_path(&self.id, &self.version)
    }
}

/// Blob storage path for `id`@`version`: `packages/{id}/{version}/{id}.{version}.nupkg`
pub fn package_storage_path(id: &str, version: &str) -> String {
    let id = id.to_lowercase();
    let version = version.to_lowercase();
    format!("packages/{id}/{version}/{id}.{version}.nupkg")
}

/// Outcome of adding a package to the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAddResult {
    /// The package was added
    Success,
    /// The version is already in the catalog
    PackageAlreadyExists,
}

/// Outcome of writing a blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePutResult {
    /// The blob was written
    Success,
    /// An identical blob is already stored at the path
    AlreadyExists,
    /// A different blob is already stored at the path
    Conflict,
}
