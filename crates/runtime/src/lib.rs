//! Async services around the cooldown game rules.
//!
//! This crate wires the catalog store, the cached ability pool, round
//! generation and the session worker into one runtime API. Servers embed
//! [`RoundService`] to answer round requests; interactive clients embed a
//! [`Session`] and drive it through [`SessionHandle`].
//!
//! Modules are organized by responsibility:
//! - [`repository`] persists the champion catalog
//! - [`cache`] and [`abilities`] serve the ability pool
//! - [`rounds`] turns requests into round batches and abstracts their source
//! - [`session`], [`api`] and [`events`] drive and observe one play session
//! - [`workers`] keeps background tasks internal to the crate
pub mod abilities;
pub mod api;
pub mod cache;
pub mod config;
pub mod events;
pub mod repository;
pub mod rounds;
pub mod session;

mod workers;

pub use abilities::AbilityRepository;
pub use api::{Result, RuntimeError, SessionHandle};
pub use cache::{Clock, ManualClock, RequestScope, SystemClock, TtlCache};
pub use config::{RuntimeConfig, SessionConfig};
pub use events::{Event, EventBus, RoundsEvent, SessionEvent, Topic};
pub use repository::{
    AbilityRecord, AbilityRow, CatalogStore, CatalogTotals, ChampionRecord, InMemoryCatalog,
    RepositoryError, SkinRecord, SqliteCatalog,
};
pub use rounds::{
    HttpRoundSource, LocalRoundSource, RoundBatch, RoundRequest, RoundService, RoundSource,
};
pub use session::{Session, SessionBuilder};
