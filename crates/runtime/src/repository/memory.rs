use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use game_core::{AbilityId, ChampionId};

use super::error::{RepositoryError, Result};
use super::traits::CatalogStore;
use super::types::{AbilityRow, CatalogTotals, ChampionRecord};

#[derive(Default)]
struct Catalog {
    next_champion_id: i64,
    next_ability_id: i64,
    /// Keyed by riot id.
    champions: BTreeMap<i64, StoredChampion>,
}

struct StoredChampion {
    id: ChampionId,
    /// First ability id assigned in the latest replacement.
    first_ability_id: i64,
    record: ChampionRecord,
}

/// In-memory implementation of [`CatalogStore`].
///
/// Ability ids are reassigned on every replacement, mirroring the delete and
/// re-insert behaviour of the SQL store.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Catalog>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = ChampionRecord>) -> Result<Self> {
        let store = Self::new();
        {
            let mut catalog = store
                .inner
                .write()
                .map_err(|_| RepositoryError::LockPoisoned)?;
            for record in records {
                catalog.replace(record);
            }
        }
        Ok(store)
    }
}

impl Catalog {
    fn replace(&mut self, record: ChampionRecord) -> ChampionId {
        let id = match self.champions.get(&record.riot_id) {
            Some(existing) => existing.id,
            None => {
                self.next_champion_id += 1;
                ChampionId(self.next_champion_id)
            }
        };

        let first_ability_id = self.next_ability_id + 1;
        self.next_ability_id += record.abilities.len() as i64;

        self.champions.insert(
            record.riot_id,
            StoredChampion {
                id,
                first_ability_id,
                record,
            },
        );
        id
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn playable_abilities(&self) -> Result<Vec<AbilityRow>> {
        let catalog = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let rows = catalog
            .champions
            .values()
            .flat_map(|stored| {
                let champion = &stored.record;
                let splashes: Vec<String> = champion
                    .skins
                    .iter()
                    .map(|skin| skin.splash_path.clone())
                    .collect();

                champion
                    .abilities
                    .iter()
                    .enumerate()
                    .filter(|(_, ability)| {
                        ability.slot.is_playable() && !ability.cooldowns.is_empty()
                    })
                    .map(move |(offset, ability)| AbilityRow {
                        id: AbilityId(stored.first_ability_id + offset as i64),
                        name: ability.name.clone(),
                        description: ability.description.clone(),
                        slot: ability.slot,
                        icon: ability.icon.clone(),
                        cooldowns: ability.cooldowns.clone(),
                        champion_id: stored.id,
                        champion_name: champion.name.clone(),
                        champion_icon: champion.icon.clone(),
                        splashes: splashes.clone(),
                    })
            })
            .collect();

        Ok(rows)
    }

    async fn replace_champion(&self, record: &ChampionRecord) -> Result<ChampionId> {
        let mut catalog = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(catalog.replace(record.clone()))
    }

    async fn totals(&self) -> Result<CatalogTotals> {
        let catalog = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let mut totals = CatalogTotals {
            champions: catalog.champions.len() as u64,
            ..CatalogTotals::default()
        };
        for stored in catalog.champions.values() {
            totals.abilities += stored.record.abilities.len() as u64;
            totals.skins += stored.record.skins.len() as u64;
        }
        Ok(totals)
    }
}
