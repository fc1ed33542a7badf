use std::sync::Arc;

use super::action::{GameAction, GuessChoice};
use crate::difficulty::Difficulty;
use crate::state::{GamePhase, GameRound, GameState};

/// Applies `action` to `state`.
///
/// Returns `Arc::clone(state)` (same allocation) when the action is a no-op:
/// a guess outside `playing` or without a round, a phase completion outside
/// its phase, and any unknown action. Only `RESTART` leaves `gameover`.
pub fn reduce(state: &Arc<GameState>, action: &GameAction) -> Arc<GameState> {
    match action {
        GameAction::StartGame { .. } if state.phase == GamePhase::Gameover => Arc::clone(state),
        GameAction::StartGame { round, queue } => Arc::new(GameState {
            phase: GamePhase::Playing,
            current_round: Some(round.clone()),
            round_queue: queue.iter().cloned().collect(),
            ..GameState::with_high_score(state.high_score)
        }),

        GameAction::Guess { choice } => {
            let Some(round) = state.current_round.as_ref() else {
                return Arc::clone(state);
            };
            if state.phase != GamePhase::Playing {
                return Arc::clone(state);
            }

            let correct = is_correct_guess(round, *choice);
            let score = if correct {
                state.score.saturating_add(1)
            } else {
                state.score
            };
            let lives = if correct {
                state.lives
            } else {
                state.lives.saturating_sub(1)
            };

            Arc::new(GameState {
                phase: GamePhase::Revealing,
                score,
                lives,
                high_score: state.high_score.max(score),
                last_guess_correct: Some(correct),
                difficulty: Difficulty::for_score(score),
                ..GameState::clone(state)
            })
        }

        GameAction::RevealComplete if state.phase != GamePhase::Revealing => Arc::clone(state),
        GameAction::RevealComplete => {
            let phase = if state.lives == 0 {
                GamePhase::Gameover
            } else {
                GamePhase::Transitioning
            };
            Arc::new(GameState {
                phase,
                ..GameState::clone(state)
            })
        }

        GameAction::TransitionComplete if state.phase != GamePhase::Transitioning => {
            Arc::clone(state)
        }
        GameAction::TransitionComplete => {
            let mut next = GameState::clone(state);
            let popped = next.round_queue.pop_front();
            next.current_round = rotate(state.current_round.as_ref(), popped);
            next.phase = GamePhase::Playing;
            next.last_guess_correct = None;
            Arc::new(next)
        }

        GameAction::QueueRounds { rounds } => {
            let mut next = GameState::clone(state);
            next.round_queue.extend(rounds.iter().cloned());
            Arc::new(next)
        }

        GameAction::Restart => Arc::new(GameState::with_high_score(state.high_score)),

        GameAction::SetHighScore { high_score } => Arc::new(GameState {
            high_score: *high_score,
            ..GameState::clone(state)
        }),

        GameAction::Unknown => Arc::clone(state),
    }
}

/// Ties are always correct; otherwise the guess must match the true order of
/// the right cooldown against the left one.
pub fn is_correct_guess(round: &GameRound, choice: GuessChoice) -> bool {
    let left = round.left.cooldown;
    let right = round.right.cooldown;

    left == right
        || match choice {
            GuessChoice::Higher => right > left,
            GuessChoice::Lower => right < left,
        }
}

/// The revealed right side becomes the new left; the popped round's left
/// becomes the new right. Without both halves the popped round (or the
/// current one) is kept whole.
fn rotate(current: Option<&GameRound>, popped: Option<GameRound>) -> Option<GameRound> {
    match (current, popped) {
        (Some(current), Some(popped)) => Some(GameRound::new(current.right.clone(), popped.left)),
        (None, Some(popped)) => Some(popped),
        (current, None) => current.cloned(),
    }
}
