//! Blob Storage Provider Implementations
//!
//! | Provider | Applies when |
//! |----------|--------------|
//! | `FileStorageProvider` | `storage.type` is `file` or `filesystem` |
//! | `MemoryStorageProvider` | `storage.type = "memory"` |
//!
//! Both follow the same put contract: identical bytes at an occupied path
//! are `AlreadyExists`, different bytes are a `Conflict`.

pub mod file;
pub mod memory;

pub use file::{FileStorageProvider, FileStorageService};
pub use memory::{MemoryStorageProvider, MemoryStorageService};
