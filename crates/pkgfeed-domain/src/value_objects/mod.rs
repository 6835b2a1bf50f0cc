//! Value objects shared by every layer

pub mod config;
pub mod package;
pub mod search;

pub use config::{
    DatabaseOptions, FeedConfig, Lifetime, ResolutionOptions, SearchOptions, SelectionMode,
    StorageOptions, backend_type_matches,
};
pub use package::{Package, PackageAddResult, StoragePutResult, package_storage_path};
pub use search::{SearchRequest, SearchResponse, SearchResult};
