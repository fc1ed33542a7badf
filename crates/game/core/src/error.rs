//! Errors raised at the round generator boundary.
//!
//! The state machine has no error type: every transition is total and an
//! action that does not apply to the current phase is a no-op.

/// Failures while building a round.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("not enough abilities to build a round: {available} available, at least 2 required")]
    InsufficientAbilities { available: usize },

    #[error("no two abilities in the pool share a compatible slot group")]
    NoCompatiblePartner,
}
