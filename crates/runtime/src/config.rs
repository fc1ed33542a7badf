//! Runtime and session configuration loaded from the environment.
use std::env;
use std::time::Duration;

use game_core::{GameConfig, TransformUltAllowlist};

use crate::abilities::AbilityRepository;

/// Settings for the ability pool and round generation.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub cache_ttl: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            cache_ttl: AbilityRepository::DEFAULT_TTL,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `ABILITY_CACHE_TTL_SECS` - Ability pool cache lifetime (default: 3600)
    /// - `TRANSFORM_ULT_CHAMPIONS` - Comma-separated champion names whose
    ///   ultimates pair with basic abilities (default: built-in list)
    /// - `ROUND_RETRY_LIMIT` - Resampling cap per pick (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = read_env::<u64>("ABILITY_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(secs);
        }

        if let Ok(list) = env::var("TRANSFORM_ULT_CHAMPIONS") {
            config.game = config
                .game
                .with_transform_ults(TransformUltAllowlist::parse(&list));
        }

        if let Some(limit) = read_env::<usize>("ROUND_RETRY_LIMIT") {
            config.game = config.game.with_retry_limit(limit);
        }

        config
    }
}

/// Settings for one play session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Rounds kept queued ahead of the current one.
    pub prefetch_target: usize,
    pub reveal_delay: Duration,
    /// Must outlast the client's slide animation.
    pub transition_delay: Duration,
    pub fetch_retry_delay: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prefetch_target: 3,
            reveal_delay: Duration::from_millis(1200),
            transition_delay: Duration::from_millis(400),
            fetch_retry_delay: Duration::from_millis(1000),
            command_buffer_size: 32,
            event_buffer_size: 100,
        }
    }
}

impl SessionConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `PREFETCH_TARGET` (default: 3)
    /// - `REVEAL_DELAY_MS` (default: 1200)
    /// - `TRANSITION_DELAY_MS` (default: 400)
    /// - `FETCH_RETRY_DELAY_MS` (default: 1000)
    /// - `SESSION_COMMAND_BUFFER` (default: 32)
    /// - `SESSION_EVENT_BUFFER` (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(target) = read_env::<usize>("PREFETCH_TARGET") {
            config.prefetch_target = target.max(1);
        }
        if let Some(ms) = read_env::<u64>("REVEAL_DELAY_MS") {
            config.reveal_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("TRANSITION_DELAY_MS") {
            config.transition_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("FETCH_RETRY_DELAY_MS") {
            config.fetch_retry_delay = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env::<usize>("SESSION_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("SESSION_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
