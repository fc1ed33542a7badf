//! Cloneable façade for issuing commands to a session.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! playing a session or streaming events from specific topics.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{GameAction, GameState, GuessChoice};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Fetch the opening rounds and enter `playing`.
    ///
    /// Outside `idle` this returns the current state untouched.
    pub async fn start(&self) -> Result<Arc<GameState>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Start { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn guess(&self, choice: GuessChoice) -> Result<Arc<GameState>> {
        self.dispatch(GameAction::Guess { choice }).await
    }

    pub async fn restart(&self) -> Result<Arc<GameState>> {
        self.dispatch(GameAction::Restart).await
    }

    /// Seeds the high score, e.g. from client storage.
    pub async fn set_high_score(&self, high_score: u32) -> Result<Arc<GameState>> {
        self.dispatch(GameAction::SetHighScore { high_score }).await
    }

    /// Apply an arbitrary action and return the resulting state.
    pub async fn dispatch(&self, action: GameAction) -> Result<Arc<GameState>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Dispatch {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the current game state (read-only snapshot)
    pub async fn state(&self) -> Result<Arc<GameState>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Every applied state change
    /// - `Topic::Rounds` - Prefetch results, failures and discarded batches
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
