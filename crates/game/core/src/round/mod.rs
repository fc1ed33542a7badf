//! Round generation.
//!
//! A round pairs two abilities of comparable magnitude. The left pick is drawn
//! from the abilities that have at least one slot-compatible partner
//! (optionally avoiding one id), the right pick from those partners. Each side is then assigned a
//! rank according to the difficulty tier and resolved to a cooldown.
//!
//! Slot compatibility is never relaxed. Every resampling loop is bounded, and
//! when a cap is exhausted the generator keeps the best candidate found
//! instead of failing the round; callers that
//! care can inspect [`GeneratedRound`].

mod sample;
mod slots;

pub use sample::{Sampled, sample_until};
pub use slots::{PartnerGroup, SlotRules};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::error::RoundError;
use crate::state::{AbilityId, AbilityWithChampion, GameAbility, GameRound, Slot};

/// A generated round plus how well its soft constraints were met.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedRound {
    pub round: GameRound,
    /// False when an exclusion id was requested and the left pick still matches it.
    pub exclusion_satisfied: bool,
}

/// Builds rounds from a pool of playable abilities.
#[derive(Clone, Debug, Default)]
pub struct RoundGenerator {
    config: GameConfig,
}

impl RoundGenerator {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn slot_rules(&self) -> SlotRules<'_> {
        SlotRules::new(&self.config.transform_ults)
    }

    /// Generates one round.
    ///
    /// `exclude_from_left` is a soft constraint: after `retry_limit` draws the
    /// last draw is kept even if it matches.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        abilities: &[AbilityWithChampion],
        difficulty: Difficulty,
        exclude_from_left: Option<AbilityId>,
    ) -> Result<GameRound, RoundError> {
        self.generate_detailed(rng, abilities, difficulty, exclude_from_left)
            .map(|generated| generated.round)
    }

    /// Generates `count` rounds meant to be shown back to back.
    ///
    /// The first round avoids `exclude_from_left`; every later round avoids the
    /// previous round's left ability, since consecutive rounds rotate into each
    /// other on screen.
    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        abilities: &[AbilityWithChampion],
        difficulty: Difficulty,
        count: usize,
        exclude_from_left: Option<AbilityId>,
    ) -> Result<Vec<GeneratedRound>, RoundError> {
        let mut rounds = Vec::with_capacity(count);
        let mut exclude = exclude_from_left;

        for _ in 0..count {
            let generated = self.generate_detailed(rng, abilities, difficulty, exclude)?;
            exclude = Some(generated.round.left.ability.id);
            rounds.push(generated);
        }

        Ok(rounds)
    }

    /// Generates one round and reports constraint satisfaction.
    pub fn generate_detailed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        abilities: &[AbilityWithChampion],
        difficulty: Difficulty,
        exclude_from_left: Option<AbilityId>,
    ) -> Result<GeneratedRound, RoundError> {
        if abilities.len() < GameConfig::MIN_POOL_SIZE {
            return Err(RoundError::InsufficientAbilities {
                available: abilities.len(),
            });
        }

        let limit = self.config.retry_limit;
        let insufficient = || RoundError::InsufficientAbilities {
            available: abilities.len(),
        };

        let rules = self.slot_rules();
        let pairable = rules.pairable(abilities);
        if pairable.is_empty() {
            return Err(RoundError::NoCompatiblePartner);
        }

        let left_pick = sample_until(
            || pairable.choose(rng).copied(),
            |candidate| exclude_from_left.is_none_or(|id| candidate.id != id),
            limit,
        )
        .ok_or_else(insufficient)?;
        let left = self.assign_level(rng, left_pick.value, difficulty);

        // The left pick itself is dropped by address so duplicate ids keep their partner
        let partners: Vec<&AbilityWithChampion> = rules
            .partners(&left.ability, abilities)
            .into_iter()
            .filter(|candidate| !std::ptr::eq(*candidate, left_pick.value))
            .collect();

        let mut right = None;
        for _ in 0..limit {
            let pick = sample_until(
                || partners.choose(rng).copied(),
                |candidate| candidate.id != left.ability.id,
                limit,
            )
            .ok_or_else(insufficient)?;
            let candidate = self.assign_level(rng, pick.value, difficulty);

            // NOTE: retries only while id AND cooldown both match; a repeated id at
            // a different rank is accepted. Kept as-is pending a product decision.
            let repeat = left.cooldown == candidate.cooldown
                && left.ability.id == candidate.ability.id;
            right = Some(candidate);
            if !repeat {
                break;
            }
        }
        let right = right.ok_or_else(insufficient)?;

        Ok(GeneratedRound {
            round: GameRound::new(left, right),
            exclusion_satisfied: left_pick.satisfied,
        })
    }

    /// Picks a rank for `ability` and resolves its cooldown.
    pub fn assign_level<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ability: &AbilityWithChampion,
        difficulty: Difficulty,
    ) -> GameAbility {
        let level = roll_level(rng, difficulty, ability.slot);
        let cooldown = ability.cooldown_at(level).unwrap_or(0.0);

        GameAbility {
            ability: ability.clone(),
            level,
            cooldown,
        }
    }
}

/// Highest rank reachable in `slot`.
pub const fn max_rank(slot: Slot) -> u32 {
    if slot.is_ultimate() {
        GameConfig::MAX_ULTIMATE_RANK
    } else {
        GameConfig::MAX_BASIC_RANK
    }
}

/// Rank 1 at beginner, otherwise uniform in `1..=max_rank(slot)`.
pub fn roll_level<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty, slot: Slot) -> u32 {
    if difficulty.pins_rank() {
        1
    } else {
        rng.gen_range(1..=max_rank(slot))
    }
}
