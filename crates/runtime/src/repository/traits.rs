//! Storage contract for the champion catalog.

use async_trait::async_trait;
use game_core::ChampionId;

use super::error::Result;
use super::types::{AbilityRow, CatalogTotals, ChampionRecord};

/// Persistent store of champions, abilities and skins.
///
/// Written by the importer and read by the ability repository. The catalog is
/// immutable outside of imports.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Abilities in a playable slot (Q/W/E/R) with a non-empty cooldown list.
    ///
    /// All-zero cooldown lists are not filtered here.
    async fn playable_abilities(&self) -> Result<Vec<AbilityRow>>;

    /// Upserts the champion by `riot_id` and replaces its abilities and skins.
    ///
    /// Runs as one unit: either the whole record lands or nothing changes.
    async fn replace_champion(&self, record: &ChampionRecord) -> Result<ChampionId>;

    async fn totals(&self) -> Result<CatalogTotals>;
}
