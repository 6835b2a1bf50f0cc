//! Capability ports
//!
//! One trait per swappable subsystem. Implementations live in
//! `pkgfeed-providers`; the resolution layer only ever hands out
//! `Arc<dyn Port>`.

pub mod catalog;
pub mod search;
pub mod storage;

pub use catalog::{PackageContext, PackageDatabase};
pub use search::{SearchIndexer, SearchService};
pub use storage::StorageService;
