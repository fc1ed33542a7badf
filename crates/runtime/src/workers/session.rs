//! Session worker that owns the authoritative [`GameState`].
//!
//! Every state change goes through this task's mailbox, so dispatches are
//! applied one at a time against the latest state. Slow work (round fetches,
//! phase timers) runs in spawned tasks that report back through an internal
//! channel tagged with the session epoch; anything tagged with an old epoch
//! is dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use game_core::{GameAction, GamePhase, GameState, reduce};

use crate::api::{Result, RuntimeError};
use crate::config::SessionConfig;
use crate::events::{Event, EventBus, RoundsEvent, SessionEvent};
use crate::rounds::{RoundBatch, RoundRequest, RoundSource};

/// Commands that can be sent to the session worker
pub enum Command {
    /// Fetch the opening rounds and start playing. Ignored outside `idle`.
    Start {
        reply: oneshot::Sender<Result<Arc<GameState>>>,
    },
    /// Apply one action to the state machine.
    Dispatch {
        action: GameAction,
        reply: oneshot::Sender<Arc<GameState>>,
    },
    /// Query the current game state (read-only).
    QueryState {
        reply: oneshot::Sender<Arc<GameState>>,
    },
}

/// Results of background work, reported back to the worker.
enum Internal {
    RoundsFetched {
        epoch: u64,
        result: Result<RoundBatch>,
    },
    RetryFetch {
        epoch: u64,
    },
    PhaseElapsed {
        epoch: u64,
        entry: u64,
    },
}

/// Background task that processes session commands.
pub struct SessionWorker {
    state: Arc<GameState>,
    config: SessionConfig,
    source: Arc<dyn RoundSource>,
    command_rx: mpsc::Receiver<Command>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    event_bus: EventBus,
    /// Bumped on start and restart; background results carry the epoch they
    /// were spawned under.
    epoch: u64,
    /// Bumped on every phase change; a timer only fires for the entry that
    /// armed it.
    phase_entry: u64,
    fetch_in_flight: bool,
}

impl SessionWorker {
    pub fn new(
        state: GameState,
        config: SessionConfig,
        source: Arc<dyn RoundSource>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(state),
            config,
            source,
            command_rx,
            internal_tx,
            internal_rx,
            event_bus,
            epoch: 0,
            phase_entry: 0,
            fetch_in_flight: false,
        }
    }

    /// Main worker loop. Returns once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                Some(internal) = self.internal_rx.recv() => {
                    self.handle_internal(internal);
                }
            }
        }
        debug!("session worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.start().await;
                if reply.send(result).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::Dispatch { action, reply } => {
                self.apply(action);
                if reply.send(Arc::clone(&self.state)).is_err() {
                    debug!("Dispatch reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(Arc::clone(&self.state)).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::RoundsFetched { epoch, result } => self.on_rounds_fetched(epoch, result),
            Internal::RetryFetch { epoch } => {
                if epoch == self.epoch {
                    self.fetch_in_flight = false;
                    self.maybe_prefetch();
                }
            }
            Internal::PhaseElapsed { epoch, entry } => {
                if epoch != self.epoch || entry != self.phase_entry {
                    return;
                }
                let action = match self.state.phase {
                    GamePhase::Revealing => GameAction::RevealComplete,
                    GamePhase::Transitioning => GameAction::TransitionComplete,
                    _ => return,
                };
                self.apply(action);
            }
        }
    }

    /// Fetches `prefetch_target + 1` rounds and dispatches `START_GAME`.
    async fn start(&mut self) -> Result<Arc<GameState>> {
        if self.state.phase != GamePhase::Idle {
            return Ok(Arc::clone(&self.state));
        }

        self.epoch += 1;
        self.fetch_in_flight = false;

        let request = RoundRequest::new(0).with_count(self.config.prefetch_target + 1);
        let batch = self.source.fetch_rounds(&request).await?;
        let mut rounds = batch.rounds.into_iter();
        let round = rounds.next().ok_or(RuntimeError::EmptyBatch)?;

        info!(epoch = self.epoch, "session started");
        self.apply(GameAction::StartGame {
            round,
            queue: rounds.collect(),
        });
        Ok(Arc::clone(&self.state))
    }

    /// Runs the reducer and schedules whatever the new phase needs.
    fn apply(&mut self, action: GameAction) {
        let name = action.name();
        let restart = matches!(action, GameAction::Restart);
        let previous = Arc::clone(&self.state);
        let next = reduce(&previous, &action);

        if restart {
            self.epoch += 1;
            self.fetch_in_flight = false;
        }

        if Arc::ptr_eq(&previous, &next) {
            debug!(action = name, phase = %previous.phase, "action ignored");
            return;
        }
        self.state = next;

        debug!(
            action = name,
            phase = %self.state.phase,
            score = self.state.score,
            lives = self.state.lives,
            queued = self.state.round_queue.len(),
            "state updated"
        );
        self.event_bus
            .publish(Event::Session(SessionEvent::StateChanged {
                action: name,
                state: Arc::clone(&self.state),
            }));

        if previous.phase != self.state.phase || restart {
            self.phase_entry += 1;
            self.arm_phase_timer();
        }
        self.maybe_prefetch();
    }

    fn arm_phase_timer(&self) {
        let delay = match self.state.phase {
            GamePhase::Revealing => self.config.reveal_delay,
            GamePhase::Transitioning => self.config.transition_delay,
            _ => return,
        };
        let message = Internal::PhaseElapsed {
            epoch: self.epoch,
            entry: self.phase_entry,
        };
        self.send_after(delay, message);
    }

    /// Tops the queue up to the target when no fetch is pending.
    fn maybe_prefetch(&mut self) {
        let queued = self.state.round_queue.len();
        let target = self.config.prefetch_target;
        if self.fetch_in_flight || !self.state.phase.wants_rounds() || queued >= target {
            return;
        }

        let request = RoundRequest::new(i64::from(self.state.score))
            .with_count(target - queued)
            .excluding(self.state.next_exclusion())
            .with_difficulty(Some(self.state.difficulty));
        self.fetch_in_flight = true;

        let epoch = self.epoch;
        let source = Arc::clone(&self.source);
        let internal_tx = self.internal_tx.clone();
        debug!(epoch, count = request.count, "prefetching rounds");
        tokio::spawn(async move {
            let result = source.fetch_rounds(&request).await;
            let _ = internal_tx.send(Internal::RoundsFetched { epoch, result });
        });
    }

    fn on_rounds_fetched(&mut self, epoch: u64, result: Result<RoundBatch>) {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "discarding stale rounds");
            self.event_bus
                .publish(Event::Rounds(RoundsEvent::Discarded { epoch }));
            return;
        }

        let result = result.and_then(|batch| {
            if batch.rounds.is_empty() {
                Err(RuntimeError::EmptyBatch)
            } else {
                Ok(batch)
            }
        });

        match result {
            Ok(batch) => {
                self.fetch_in_flight = false;
                let count = batch.rounds.len();
                self.event_bus
                    .publish(Event::Rounds(RoundsEvent::Fetched { epoch, count }));
                self.apply(GameAction::QueueRounds {
                    rounds: batch.rounds,
                });
            }
            Err(error) => {
                warn!(epoch, %error, "round prefetch failed; retrying");
                self.event_bus.publish(Event::Rounds(RoundsEvent::FetchFailed {
                    epoch,
                    error: error.to_string(),
                }));
                // fetch_in_flight stays set until the retry fires
                self.send_after(self.config.fetch_retry_delay, Internal::RetryFetch { epoch });
            }
        }
    }

    fn send_after(&self, delay: Duration, message: Internal) {
        let internal_tx = self.internal_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = internal_tx.send(message);
        });
    }
}
