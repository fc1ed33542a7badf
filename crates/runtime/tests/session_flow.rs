use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{
    AbilityId, AbilityWithChampion, ChampionId, ChampionSummary, Difficulty, GameAbility,
    GamePhase, GameRound, GameState, GuessChoice, Slot,
};
use runtime::{
    Event, RoundBatch, RoundRequest, RoundSource, RoundsEvent, RuntimeError, Session,
    SessionConfig, SessionHandle, Topic,
};

const LEFT_COOLDOWN: f64 = 10.0;
const RIGHT_COOLDOWN: f64 = 20.0;

/// Round source that hands out fresh ability ids and records every request.
#[derive(Default)]
struct ScriptedSource {
    next_id: AtomicI64,
    failures_left: AtomicUsize,
    delay: Duration,
    requests: Mutex<Vec<RoundRequest>>,
}

impl ScriptedSource {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    fn requests(&self) -> Vec<RoundRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn ability(&self, cooldown: f64) -> GameAbility {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        GameAbility {
            ability: AbilityWithChampion {
                id: AbilityId(id),
                name: format!("Ability {id}"),
                description: None,
                slot: Slot::Q,
                icon: None,
                cooldowns: vec![cooldown],
                champion: ChampionSummary {
                    id: ChampionId(id),
                    name: format!("Champion {id}"),
                    icon: format!("/icons/{id}.png"),
                    splash: None,
                },
            },
            level: 1,
            cooldown,
        }
    }
}

#[async_trait]
impl RoundSource for ScriptedSource {
    async fn fetch_rounds(&self, request: &RoundRequest) -> runtime::Result<RoundBatch> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RuntimeError::RoundApi {
                status: 500,
                message: "Failed to generate game rounds".to_string(),
            });
        }

        let rounds = (0..request.clamped_count())
            .map(|_| GameRound::new(self.ability(LEFT_COOLDOWN), self.ability(RIGHT_COOLDOWN)))
            .collect();
        Ok(RoundBatch {
            rounds,
            difficulty: request.resolved_difficulty(),
        })
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        prefetch_target: 3,
        reveal_delay: Duration::from_millis(1200),
        transition_delay: Duration::from_millis(400),
        fetch_retry_delay: Duration::from_millis(1000),
        ..SessionConfig::default()
    }
}

fn spawn(source: &Arc<ScriptedSource>) -> (Session, SessionHandle) {
    let session = Session::builder()
        .config(config())
        .build(Arc::clone(source) as Arc<dyn RoundSource>);
    let handle = session.handle();
    (session, handle)
}

/// Sleeps through the reveal and transition pauses.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1200 + 400 + 50)).await;
}

fn wrong_choice(state: &GameState) -> GuessChoice {
    let round = state.current_round.as_ref().expect("round loaded");
    if round.right.cooldown > round.left.cooldown {
        GuessChoice::Lower
    } else {
        GuessChoice::Higher
    }
}

#[tokio::test(start_paused = true)]
async fn start_loads_round_and_fills_queue() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);

    let state = handle.start().await.expect("start should succeed");

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.round_queue.len(), 3);
    assert_eq!(state.lives, 3);
    assert_eq!(state.difficulty, Difficulty::Beginner);

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].count, 4);
    assert_eq!(requests[0].exclude_id, None);
}

#[tokio::test(start_paused = true)]
async fn start_outside_idle_is_ignored() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);

    let first = handle.start().await.unwrap();
    let second = handle.start().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn guess_reveals_then_rotates_and_refills() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);
    let started = handle.start().await.unwrap();
    let opening = started.current_round.clone().unwrap();
    let next_queued = started.round_queue[0].clone();

    let revealed = handle.guess(GuessChoice::Higher).await.unwrap();
    assert_eq!(revealed.phase, GamePhase::Revealing);
    assert_eq!(revealed.score, 1);
    assert_eq!(revealed.last_guess_correct, Some(true));

    tokio::time::sleep(Duration::from_millis(1250)).await;
    assert_eq!(
        handle.state().await.unwrap().phase,
        GamePhase::Transitioning
    );

    tokio::time::sleep(Duration::from_millis(450)).await;
    let state = handle.state().await.unwrap();
    let round = state.current_round.as_ref().unwrap();

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(round.left, opening.right);
    assert_eq!(round.right, next_queued.left);
    assert_eq!(state.last_guess_correct, None);
    assert_eq!(state.round_queue.len(), 3);

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].count, 1);
    assert_eq!(requests[1].score, 1);
    assert_eq!(
        requests[1].exclude_id,
        Some(started.round_queue[2].left.ability.id)
    );
}

#[tokio::test(start_paused = true)]
async fn guesses_during_reveal_are_ignored() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);
    handle.start().await.unwrap();

    let first = handle.guess(GuessChoice::Higher).await.unwrap();
    let second = handle.guess(GuessChoice::Lower).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.score, 1);
    assert_eq!(second.lives, 3);
}

#[tokio::test(start_paused = true)]
async fn three_misses_end_the_game_after_reveal() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);
    let mut state = handle.start().await.unwrap();

    for expected_lives in [2, 1] {
        state = handle.guess(wrong_choice(&state)).await.unwrap();
        assert_eq!(state.lives, expected_lives);
        settle().await;
        state = handle.state().await.unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    state = handle.guess(wrong_choice(&state)).await.unwrap();
    assert_eq!(state.lives, 0);
    assert_eq!(state.phase, GamePhase::Revealing);

    settle().await;
    let over = handle.state().await.unwrap();
    assert_eq!(over.phase, GamePhase::Gameover);

    let after = handle.guess(GuessChoice::Higher).await.unwrap();
    assert!(Arc::ptr_eq(&over, &after));
}

#[tokio::test(start_paused = true)]
async fn restart_keeps_high_score_and_allows_new_start() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);
    handle.set_high_score(7).await.unwrap();
    handle.start().await.unwrap();
    handle.guess(GuessChoice::Higher).await.unwrap();

    let restarted = handle.restart().await.unwrap();
    assert_eq!(restarted.phase, GamePhase::Idle);
    assert_eq!(restarted.score, 0);
    assert_eq!(restarted.high_score, 7);
    assert!(restarted.current_round.is_none());

    // a pending reveal timer from before the restart must not fire
    settle().await;
    assert_eq!(handle.state().await.unwrap().phase, GamePhase::Idle);

    let again = handle.start().await.unwrap();
    assert_eq!(again.phase, GamePhase::Playing);
    assert_eq!(again.high_score, 7);
}

#[tokio::test(start_paused = true)]
async fn rounds_fetched_before_restart_are_discarded() {
    let source = Arc::new(ScriptedSource::with_delay(Duration::from_secs(5)));
    let (_session, handle) = spawn(&source);
    let mut rounds_rx = handle.subscribe(Topic::Rounds);

    handle.start().await.unwrap();
    handle.guess(GuessChoice::Higher).await.unwrap();
    settle().await;
    assert_eq!(source.requests().len(), 2, "prefetch should be in flight");

    handle.restart().await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;

    match rounds_rx.recv().await.unwrap() {
        Event::Rounds(RoundsEvent::Discarded { .. }) => {}
        other => panic!("expected discarded batch, got {other:?}"),
    }
    let state = handle.state().await.unwrap();
    assert_eq!(state.phase, GamePhase::Idle);
    assert!(state.round_queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_prefetch_is_retried() {
    let source = Arc::new(ScriptedSource::default());
    let (_session, handle) = spawn(&source);
    let mut rounds_rx = handle.subscribe(Topic::Rounds);

    handle.start().await.unwrap();
    source.fail_next(1);
    handle.guess(GuessChoice::Higher).await.unwrap();
    settle().await;

    match rounds_rx.recv().await.unwrap() {
        Event::Rounds(RoundsEvent::FetchFailed { error, .. }) => {
            assert!(error.contains("Failed to generate game rounds"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(handle.state().await.unwrap().round_queue.len(), 2);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    match rounds_rx.recv().await.unwrap() {
        Event::Rounds(RoundsEvent::Fetched { count, .. }) => assert_eq!(count, 1),
        other => panic!("expected fetched rounds, got {other:?}"),
    }
    assert_eq!(handle.state().await.unwrap().round_queue.len(), 3);
    assert_eq!(source.requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn start_failure_leaves_session_idle() {
    let source = Arc::new(ScriptedSource::default());
    source.fail_next(1);
    let (_session, handle) = spawn(&source);

    let result = handle.start().await;

    assert!(matches!(result, Err(RuntimeError::RoundApi { status: 500, .. })));
    assert_eq!(handle.state().await.unwrap().phase, GamePhase::Idle);
}

#[tokio::test]
async fn shutdown_joins_worker() {
    let source = Arc::new(ScriptedSource::default());
    let (session, handle) = spawn(&source);
    drop(handle);

    session.shutdown().await.expect("worker should exit cleanly");
}
