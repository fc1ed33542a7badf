//! Pure rules for the cooldown guessing game.
//!
//! `game-core` owns the ability read-models, the difficulty curve, the round
//! generator, and the session reducer. Nothing here performs I/O: randomness
//! is passed in as an [`rand::Rng`] and state transitions go through
//! [`engine::reduce`], so the runtime and offline tools share one set of rules.
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod round;
pub mod state;

pub use config::{GameConfig, TransformUltAllowlist};
pub use difficulty::Difficulty;
pub use engine::{GameAction, GuessChoice, is_correct_guess, reduce};
pub use error::RoundError;
pub use round::{GeneratedRound, RoundGenerator, max_rank, roll_level};
pub use state::{
    AbilityId, AbilityWithChampion, ChampionId, ChampionSummary, GameAbility, GamePhase,
    GameRound, GameState, Slot, cooldown_at_level, has_positive_cooldown,
};
