//! Backend composition
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bootstrap`] | Registry setup, `AppContext`, reload |
//! | [`diagnostics`] | Per-capability selection report |

pub mod bootstrap;
pub mod diagnostics;

pub use bootstrap::{AppContext, AvailableProviders, default_registry, indexing_service};
pub use diagnostics::{SelectionEntry, SelectionReport, diagnose};
