//! Ability read-models consumed by the round generator.
//!
//! These are projections of the persisted catalog: an ability joined with a
//! reduced view of its champion. They carry no storage identity beyond the
//! numeric ids, so the core stays independent of the database layer.

use std::fmt;

/// Database identity of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub i64);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identity of a champion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChampionId(pub i64);

impl fmt::Display for ChampionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ability slot on the champion's kit.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Slot {
    /// Passive. Has no ranks and never takes part in a round.
    P,
    Q,
    W,
    E,
    /// Ultimate.
    R,
}

impl Slot {
    pub const fn is_basic(self) -> bool {
        matches!(self, Slot::Q | Slot::W | Slot::E)
    }

    pub const fn is_ultimate(self) -> bool {
        matches!(self, Slot::R)
    }

    pub const fn is_playable(self) -> bool {
        !matches!(self, Slot::P)
    }
}

/// Reduced champion projection attached to every ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChampionSummary {
    pub id: ChampionId,
    pub name: String,
    pub icon: String,
    /// Splash art of a randomly chosen skin, `None` when the champion has no skins.
    pub splash: Option<String>,
}

/// An ability joined with its champion, as served to the round generator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityWithChampion {
    pub id: AbilityId,
    pub name: String,
    pub description: Option<String>,
    pub slot: Slot,
    pub icon: Option<String>,
    /// Cooldown per rank; rank 1 is index 0.
    pub cooldowns: Vec<f64>,
    pub champion: ChampionSummary,
}

impl AbilityWithChampion {
    /// True when the ability has at least one positive cooldown value.
    pub fn has_valid_cooldowns(&self) -> bool {
        has_positive_cooldown(&self.cooldowns)
    }

    /// Cooldown at the given 1-based rank.
    ///
    /// Ranks past the end of the data clamp to the last known value. Returns
    /// `None` only when the cooldown list is empty.
    pub fn cooldown_at(&self, level: u32) -> Option<f64> {
        cooldown_at_level(&self.cooldowns, level)
    }
}

/// True when `cooldowns` is non-empty and holds a value greater than zero.
pub fn has_positive_cooldown(cooldowns: &[f64]) -> bool {
    cooldowns.iter().any(|cd| *cd > 0.0)
}

/// Resolves the cooldown for a 1-based rank, clamping to the last index.
pub fn cooldown_at_level(cooldowns: &[f64], level: u32) -> Option<f64> {
    let last = cooldowns.len().checked_sub(1)?;
    let index = (level.max(1) as usize - 1).min(last);
    cooldowns.get(index).copied()
}

/// One side of a round: an ability at a chosen rank.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameAbility {
    pub ability: AbilityWithChampion,
    /// 1-based rank used for this comparison.
    pub level: u32,
    /// Cooldown at `level`.
    pub cooldown: f64,
}

/// A left/right comparison. `left` is the revealed side, `right` is guessed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameRound {
    pub left: GameAbility,
    pub right: GameAbility,
}

impl GameRound {
    pub fn new(left: GameAbility, right: GameAbility) -> Self {
        Self { left, right }
    }

    /// True when both sides reference distinct abilities.
    pub fn is_distinct(&self) -> bool {
        self.left.ability.id != self.right.ability.id
    }
}
