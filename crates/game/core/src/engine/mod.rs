//! Session state machine.
//!
//! [`reduce`] is the only way a [`GameState`] changes. It is a pure function:
//! given a state and an action it returns the next state, or the very same
//! `Arc` when the action does not apply to the current phase. Hosts must feed
//! actions one at a time so a guess is always judged against the round the
//! player saw.

mod action;
mod reducer;

pub use action::{GameAction, GuessChoice};
pub use reducer::{is_correct_guess, reduce};
