//! Use cases orchestrating the capability ports

pub mod package_indexing;

pub use package_indexing::{PackageIndexingResult, PackageIndexingService, PackageUpload};
