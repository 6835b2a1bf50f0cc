//! # Domain Layer
//!
//! Types shared by every pkgfeed crate:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`ports`] | Capability traits (catalog, storage, search) |
//! | [`value_objects`] | Configuration snapshot, packages, search requests |

pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result, ValidationFailure};
