//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the session worker, the catalog, round generation and
//! remote round sources so callers can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::RoundError;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("round request failed")]
    RoundFetch(#[source] reqwest::Error),

    #[error("round API returned {status}: {message}")]
    RoundApi { status: u16, message: String },

    #[error("round source returned no rounds")]
    EmptyBatch,
}

impl RuntimeError {
    /// True when the catalog holds too few playable abilities to build a round.
    pub fn is_insufficient_abilities(&self) -> bool {
        matches!(
            self,
            RuntimeError::Round(RoundError::InsufficientAbilities { .. })
        )
    }
}
