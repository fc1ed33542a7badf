use std::collections::BTreeSet;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Champions whose ultimate is a short-cooldown transform or toggle and
    /// may be compared against basic abilities.
    pub transform_ults: TransformUltAllowlist,
    /// Attempt cap for every resampling loop in the round generator.
    pub retry_limit: usize,
}

impl GameConfig {
    // ===== rules =====
    pub const INITIAL_LIVES: u32 = 3;
    /// Highest rank a basic (Q/W/E) ability reaches.
    pub const MAX_BASIC_RANK: u32 = 5;
    /// Highest rank an ultimate reaches.
    pub const MAX_ULTIMATE_RANK: u32 = 3;
    /// Minimum pool size needed to build a round.
    pub const MIN_POOL_SIZE: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RETRY_LIMIT: usize = 100;

    pub fn new() -> Self {
        Self {
            transform_ults: TransformUltAllowlist::default(),
            retry_limit: Self::DEFAULT_RETRY_LIMIT,
        }
    }

    pub fn with_transform_ults(mut self, transform_ults: TransformUltAllowlist) -> Self {
        self.transform_ults = transform_ults;
        self
    }

    pub fn with_retry_limit(mut self, retry_limit: usize) -> Self {
        self.retry_limit = retry_limit.max(1);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Champion names whose R ability is grouped with basic abilities.
///
/// Keyed by display name. The set is data: load it from configuration to add
/// or remove champions without touching the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformUltAllowlist {
    champions: BTreeSet<String>,
}

impl TransformUltAllowlist {
    pub const DEFAULT_CHAMPIONS: [&'static str; 9] = [
        "Zoe", "Kog'Maw", "LeBlanc", "Teemo", "Corki", "Nidalee", "Jayce", "Anivia", "Kha'Zix",
    ];

    pub fn new<I, S>(champions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            champions: champions
                .into_iter()
                .map(|name| {
                    let name: String = name.into();
                    name.trim().to_string()
                })
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// An allowlist with no champions: every ultimate is a plain ultimate.
    pub fn empty() -> Self {
        Self {
            champions: BTreeSet::new(),
        }
    }

    /// Parses a comma-separated list of champion names.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, champion_name: &str) -> bool {
        self.champions.contains(champion_name)
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }
}

impl Default for TransformUltAllowlist {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHAMPIONS)
    }
}
