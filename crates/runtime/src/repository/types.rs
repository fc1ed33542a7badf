//! Persisted catalog entities.
//!
//! Records are what the importer writes; [`AbilityRow`] is what the ability
//! repository reads back before a skin is chosen for each champion.

use game_core::{AbilityId, ChampionId, Slot};
use serde::{Deserialize, Serialize};

/// Champion with its full child set, replaced atomically by the importer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChampionRecord {
    /// Upstream numeric id; the upsert key.
    pub riot_id: i64,
    /// Upstream alias, e.g. `MonkeyKing`.
    pub key: String,
    pub name: String,
    pub title: String,
    pub icon: String,
    pub roles: Vec<String>,
    pub abilities: Vec<AbilityRecord>,
    pub skins: Vec<SkinRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub slot: Slot,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Cooldown per rank. Empty for passives.
    pub cooldowns: Vec<f64>,
    pub affected_by_cdr: bool,
    pub costs: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkinRecord {
    pub riot_id: i64,
    pub name: String,
    pub is_base: bool,
    pub rarity: Option<String>,
    pub is_legacy: bool,
    pub splash_path: String,
    pub tile_path: Option<String>,
}

/// Play-eligible ability as stored, with every splash path of its champion.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityRow {
    pub id: AbilityId,
    pub name: String,
    pub description: Option<String>,
    pub slot: Slot,
    pub icon: Option<String>,
    pub cooldowns: Vec<f64>,
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub champion_icon: String,
    pub splashes: Vec<String>,
}

/// Aggregate row counts reported after an import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTotals {
    pub champions: u64,
    pub abilities: u64,
    pub skins: u64,
}
