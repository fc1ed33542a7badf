use crate::state::GameRound;

/// The player's call on the right side's cooldown relative to the left side.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GuessChoice {
    Higher,
    Lower,
}

/// Inputs to the state machine.
///
/// Only fully formed rounds can be dispatched; there is no partial-round action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum GameAction {
    /// Begin a session with a first round and an initial queue.
    StartGame {
        round: GameRound,
        queue: Vec<GameRound>,
    },
    Guess {
        choice: GuessChoice,
    },
    RevealComplete,
    TransitionComplete,
    /// Append prefetched rounds to the tail of the queue.
    QueueRounds {
        rounds: Vec<GameRound>,
    },
    Restart,
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    SetHighScore {
        high_score: u32,
    },
    /// Any action type this version does not know. Always a no-op.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl GameAction {
    pub fn name(&self) -> &'static str {
        match self {
            GameAction::StartGame { .. } => "START_GAME",
            GameAction::Guess { .. } => "GUESS",
            GameAction::RevealComplete => "REVEAL_COMPLETE",
            GameAction::TransitionComplete => "TRANSITION_COMPLETE",
            GameAction::QueueRounds { .. } => "QUEUE_ROUNDS",
            GameAction::Restart => "RESTART",
            GameAction::SetHighScore { .. } => "SET_HIGH_SCORE",
            GameAction::Unknown => "UNKNOWN",
        }
    }
}
