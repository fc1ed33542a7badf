//! HTTP surface for round generation.
//!
//! The server is a thin shell: every request gets its own
//! [`runtime::RequestScope`] and is answered by a shared
//! [`runtime::RoundService`].
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, SharedState};
