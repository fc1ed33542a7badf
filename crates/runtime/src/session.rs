//! Session orchestrator.
//!
//! A [`Session`] owns the background worker for one play session and exposes
//! a cloneable [`SessionHandle`] to drive it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_core::GameState;

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::config::SessionConfig;
use crate::events::EventBus;
use crate::rounds::RoundSource;
use crate::workers::{Command, SessionWorker};

/// One running play session.
pub struct Session {
    handle: SessionHandle,
    worker_handle: JoinHandle<()>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Get a cloneable handle to this session
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Drops this session's handle and waits for the worker to exit.
    ///
    /// The worker keeps running while other handle clones are alive.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

pub struct SessionBuilder {
    config: SessionConfig,
    high_score: u32,
    event_bus: Option<EventBus>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            high_score: 0,
            event_bus: None,
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// High score carried over from a previous session.
    pub fn high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Spawns the worker on the current tokio runtime.
    pub fn build(self, source: Arc<dyn RoundSource>) -> Session {
        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));

        let handle = SessionHandle::new(command_tx, event_bus.clone());
        let worker = SessionWorker::new(
            GameState::with_high_score(self.high_score),
            self.config,
            source,
            command_rx,
            event_bus,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Session {
            handle,
            worker_handle,
        }
    }
}
