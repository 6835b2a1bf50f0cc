//! Search Provider Implementations
//!
//! | Provider | Capability | Applies when |
//! |----------|------------|--------------|
//! | `DatabaseSearchProvider` | search | `search.type = "database"` |
//! | `NullSearchProvider` | search | `search.type = "null"` |
//! | `NullSearchIndexerProvider` | search_indexer | `search.type` is `database` or `null` |

pub mod database;
pub mod null;

pub use database::{DatabaseSearchProvider, DatabaseSearchService};
pub use null::{NullSearchIndexer, NullSearchIndexerProvider, NullSearchProvider, NullSearchService};
