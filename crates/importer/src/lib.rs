//! Catalog import: pulls champion data from an upstream feed, normalizes it
//! and writes it through a [`runtime::CatalogStore`].
//!
//! [`source`] hides the schema differences between feeds, [`normalize`] holds
//! the shared field rules, [`mirror`] copies artwork locally and [`seeder`]
//! drives the per-champion loop.
pub mod error;
pub mod mirror;
pub mod normalize;
pub mod seeder;
pub mod source;

pub use error::{ImportError, Result, SourceError};
pub use mirror::{AssetMirror, MirrorOutcome, MirrorStats};
pub use seeder::{DEFAULT_DELAY, ImportFailure, ImportReport, Seeder};
pub use source::{CDragonSource, ChampionRef, ChampionSource, MerakiSource};
