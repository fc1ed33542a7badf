//! Slot compatibility between the two sides of a round.
//!
//! Plain ultimates are only compared with plain ultimates. Basic abilities are
//! compared with basic abilities and with allowlisted transform ultimates,
//! whose cooldowns sit in the same range.

use crate::config::TransformUltAllowlist;
use crate::state::{AbilityWithChampion, Slot};

/// Partner group a left-side pick may be paired with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartnerGroup {
    /// Ultimates whose champion is not on the allowlist.
    PlainUltimates,
    /// Q/W/E abilities plus allowlisted ultimates.
    BasicAndTransform,
}

/// Slot matching rules backed by a transform-ultimate allowlist.
#[derive(Clone, Copy, Debug)]
pub struct SlotRules<'a> {
    transform_ults: &'a TransformUltAllowlist,
}

impl<'a> SlotRules<'a> {
    pub fn new(transform_ults: &'a TransformUltAllowlist) -> Self {
        Self { transform_ults }
    }

    pub fn is_transform_ult(&self, ability: &AbilityWithChampion) -> bool {
        ability.slot == Slot::R && self.transform_ults.contains(&ability.champion.name)
    }

    pub fn is_plain_ult(&self, ability: &AbilityWithChampion) -> bool {
        ability.slot == Slot::R && !self.transform_ults.contains(&ability.champion.name)
    }

    /// Group of abilities that `left` may be compared against.
    pub fn partner_group(&self, left: &AbilityWithChampion) -> PartnerGroup {
        if self.is_plain_ult(left) {
            PartnerGroup::PlainUltimates
        } else {
            PartnerGroup::BasicAndTransform
        }
    }

    /// Whether `candidate` belongs to `group`.
    pub fn accepts(&self, group: PartnerGroup, candidate: &AbilityWithChampion) -> bool {
        match group {
            PartnerGroup::PlainUltimates => self.is_plain_ult(candidate),
            PartnerGroup::BasicAndTransform => {
                candidate.slot.is_basic() || self.is_transform_ult(candidate)
            }
        }
    }

    /// Abilities from `pool` eligible to sit opposite `left`.
    pub fn partners<'p>(
        &self,
        left: &AbilityWithChampion,
        pool: &'p [AbilityWithChampion],
    ) -> Vec<&'p AbilityWithChampion> {
        let group = self.partner_group(left);
        pool.iter()
            .filter(|candidate| self.accepts(group, candidate))
            .collect()
    }

    /// Abilities from `pool` that have at least one partner other than themselves.
    pub fn pairable<'p>(&self, pool: &'p [AbilityWithChampion]) -> Vec<&'p AbilityWithChampion> {
        let plain_ults = pool.iter().filter(|a| self.is_plain_ult(a)).count();
        let basic_and_transform = pool
            .iter()
            .filter(|a| self.accepts(PartnerGroup::BasicAndTransform, a))
            .count();

        pool.iter()
            .filter(|ability| {
                let group = self.partner_group(ability);
                let members = match group {
                    PartnerGroup::PlainUltimates => plain_ults,
                    PartnerGroup::BasicAndTransform => basic_and_transform,
                };
                members > usize::from(self.accepts(group, ability))
            })
            .collect()
    }
}
