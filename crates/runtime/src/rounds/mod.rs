//! Round service: turns a round request into a batch of generated rounds.

mod source;

pub use source::{HttpRoundSource, LocalRoundSource, RoundSource};

use std::sync::Arc;

use game_core::{
    AbilityId, AbilityWithChampion, Difficulty, GameConfig, GameRound, RoundGenerator,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityRepository;
use crate::api::Result;
use crate::cache::RequestScope;

/// Parameters of one `GET /rounds` call.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundRequest {
    pub score: i64,
    pub count: usize,
    /// Ability that must not open the first round.
    pub exclude_id: Option<AbilityId>,
    /// Overrides the tier derived from `score`.
    pub difficulty: Option<Difficulty>,
}

impl RoundRequest {
    pub const DEFAULT_COUNT: usize = 2;
    pub const MAX_COUNT: usize = 5;

    pub fn new(score: i64) -> Self {
        Self {
            score,
            count: Self::DEFAULT_COUNT,
            exclude_id: None,
            difficulty: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn excluding(mut self, exclude_id: Option<AbilityId>) -> Self {
        self.exclude_id = exclude_id;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Requested count clamped to `1..=MAX_COUNT`.
    pub fn clamped_count(&self) -> usize {
        self.count.clamp(1, Self::MAX_COUNT)
    }

    pub fn resolved_difficulty(&self) -> Difficulty {
        self.difficulty
            .unwrap_or_else(|| Difficulty::for_score(self.score as f64))
    }
}

impl Default for RoundRequest {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Response body of `GET /rounds`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundBatch {
    pub rounds: Vec<GameRound>,
    pub difficulty: Difficulty,
}

/// Generates rounds from the repository's ability pool.
pub struct RoundService {
    abilities: Arc<AbilityRepository>,
    generator: RoundGenerator,
}

impl RoundService {
    pub fn new(abilities: Arc<AbilityRepository>, config: GameConfig) -> Self {
        Self {
            abilities,
            generator: RoundGenerator::new(config),
        }
    }

    pub fn abilities(&self) -> &Arc<AbilityRepository> {
        &self.abilities
    }

    pub async fn generate(&self, request: &RoundRequest) -> Result<RoundBatch> {
        self.generate_in(&RequestScope::new(), request).await
    }

    /// Generates against the pool pinned in `scope`.
    pub async fn generate_in(
        &self,
        scope: &RequestScope<Vec<AbilityWithChampion>>,
        request: &RoundRequest,
    ) -> Result<RoundBatch> {
        let abilities = self.abilities.valid_abilities_in(scope).await?;
        self.generate_from(abilities, request, &mut rand::thread_rng())
    }

    /// Generates from an explicit pool. The first round honours the request's
    /// exclusion; later rounds exclude the previous round's left ability.
    pub fn generate_from<R: Rng + ?Sized>(
        &self,
        abilities: &[AbilityWithChampion],
        request: &RoundRequest,
        rng: &mut R,
    ) -> Result<RoundBatch> {
        let difficulty = request.resolved_difficulty();
        let generated = self.generator.generate_batch(
            rng,
            abilities,
            difficulty,
            request.clamped_count(),
            request.exclude_id,
        )?;

        let mut rounds = Vec::with_capacity(generated.len());
        for entry in generated {
            if !entry.exclusion_satisfied {
                tracing::debug!(
                    left = %entry.round.left.ability.id,
                    "exclusion retries exhausted; keeping last draw"
                );
            }
            rounds.push(entry.round);
        }

        tracing::debug!(
            count = rounds.len(),
            %difficulty,
            pool = abilities.len(),
            "generated rounds"
        );
        Ok(RoundBatch { rounds, difficulty })
    }
}
