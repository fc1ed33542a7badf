use std::sync::Arc;

use runtime::RoundService;

pub type SharedState = Arc<AppState>;

/// Services shared by every request handler.
pub struct AppState {
    rounds: Arc<RoundService>,
}

impl AppState {
    pub fn new(rounds: Arc<RoundService>) -> SharedState {
        Arc::new(Self { rounds })
    }

    pub fn rounds(&self) -> &RoundService {
        &self.rounds
    }
}
