//! Champion catalog storage.
//!
//! The catalog is written by the importer and read by the ability repository.
//! [`SqliteCatalog`] is the production store; [`InMemoryCatalog`] backs tests
//! and offline tools.

mod error;
mod memory;
mod sqlite;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryCatalog;
pub use sqlite::{SqliteCatalog, default_database_path, default_database_url};
pub use traits::CatalogStore;
pub use types::{AbilityRecord, AbilityRow, CatalogTotals, ChampionRecord, SkinRecord};
