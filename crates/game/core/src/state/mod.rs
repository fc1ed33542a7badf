//! Session state and the ability read-models it is built from.
//!
//! Runtime layers hold [`GameState`] behind an `Arc` and replace it wholesale
//! with whatever [`crate::engine::reduce`] returns.
mod ability;

pub use ability::{
    AbilityId, AbilityWithChampion, ChampionId, ChampionSummary, GameAbility, GameRound, Slot,
    cooldown_at_level, has_positive_cooldown,
};

use std::collections::VecDeque;

use crate::config::GameConfig;
use crate::difficulty::Difficulty;

/// Phase of a play session.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum GamePhase {
    /// No round loaded yet.
    #[default]
    Idle,
    /// Waiting for a guess.
    Playing,
    /// Guess evaluated, right cooldown shown.
    Revealing,
    /// Rotating to the next round.
    Transitioning,
    /// Lives exhausted. Only a restart leaves this phase.
    Gameover,
}

impl GamePhase {
    /// Phases during which the round queue should be kept topped up.
    pub const fn wants_rounds(self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::Revealing | GamePhase::Transitioning
        )
    }
}

/// Snapshot of one play session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    /// Highest score reached; survives restarts.
    pub high_score: u32,
    pub lives: u32,
    pub current_round: Option<GameRound>,
    /// Prefetched rounds, consumed head first.
    pub round_queue: VecDeque<GameRound>,
    /// Outcome of the last guess; `None` until a guess is made in this round.
    pub last_guess_correct: Option<bool>,
    /// Tier derived from `score`; applies to rounds generated from now on.
    pub difficulty: Difficulty,
}

impl GameState {
    /// Fresh idle state.
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            high_score: 0,
            lives: GameConfig::INITIAL_LIVES,
            current_round: None,
            round_queue: VecDeque::new(),
            last_guess_correct: None,
            difficulty: Difficulty::Beginner,
        }
    }

    /// Fresh idle state carrying over a high score.
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            ..Self::new()
        }
    }

    /// Ability id shown right before the first round appended to the queue.
    ///
    /// After rotation the new left side is the previous right side, so a fetched
    /// round should not open with the ability that will precede it on screen.
    pub fn next_exclusion(&self) -> Option<AbilityId> {
        match self.round_queue.back() {
            Some(round) => Some(round.left.ability.id),
            None => self
                .current_round
                .as_ref()
                .map(|round| round.right.ability.id),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
