use std::sync::Arc;

use game_core::GameState;

/// Session state changes.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// An action changed the state.
    StateChanged {
        /// Name of the applied action, e.g. `GUESS`.
        action: &'static str,
        state: Arc<GameState>,
    },
}

/// Round prefetch outcomes.
#[derive(Debug, Clone)]
pub enum RoundsEvent {
    Fetched { epoch: u64, count: usize },
    FetchFailed { epoch: u64, error: String },
    /// A fetch resolved after a restart and its rounds were dropped.
    Discarded { epoch: u64 },
}
