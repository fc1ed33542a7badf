//! Ability repository: the play-eligible ability pool behind a TTL cache.

use std::sync::Arc;
use std::time::Duration;

use game_core::{AbilityWithChampion, ChampionSummary, has_positive_cooldown};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cache::{Clock, RequestScope, SystemClock, TtlCache};
use crate::repository::{AbilityRow, CatalogStore, RepositoryError, Result};

/// Serves the abilities the round generator may draw from.
///
/// Filtered storage rows are cached process-wide for one TTL window; the
/// champion splash is re-rolled on every read, so two reads within the window
/// share rows but not necessarily splash art.
pub struct AbilityRepository {
    store: Arc<dyn CatalogStore>,
    rows: TtlCache<(), Arc<Vec<AbilityRow>>>,
}

impl AbilityRepository {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn new(store: Arc<dyn CatalogStore>, ttl: Duration) -> Self {
        Self::with_clock(store, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn CatalogStore>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            rows: TtlCache::with_clock(ttl, clock),
        }
    }

    /// Valid abilities with a freshly chosen splash per ability.
    pub async fn valid_abilities(&self) -> Result<Vec<AbilityWithChampion>> {
        let rows = self.cached_rows().await?;
        Ok(project_all(&rows, &mut rand::thread_rng()))
    }

    /// Like [`valid_abilities`](Self::valid_abilities) with a caller-provided RNG.
    pub async fn valid_abilities_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<AbilityWithChampion>> {
        let rows = self.cached_rows().await?;
        Ok(project_all(&rows, rng))
    }

    /// Loads the pool at most once for the lifetime of `scope`.
    pub async fn valid_abilities_in<'s>(
        &self,
        scope: &'s RequestScope<Vec<AbilityWithChampion>>,
    ) -> Result<&'s [AbilityWithChampion]> {
        let abilities = scope.get_or_load(|| self.valid_abilities()).await?;
        Ok(abilities.as_slice())
    }

    /// Drops the cached rows so the next read hits storage.
    pub async fn refresh(&self) {
        self.rows.clear().await;
    }

    async fn cached_rows(&self) -> Result<Arc<Vec<AbilityRow>>> {
        self.rows
            .get_or_populate((), || async {
                let rows: Vec<AbilityRow> = self
                    .store
                    .playable_abilities()
                    .await?
                    .into_iter()
                    .filter(|row| has_positive_cooldown(&row.cooldowns))
                    .collect();
                tracing::debug!(abilities = rows.len(), "loaded ability pool");
                Ok::<_, RepositoryError>(Arc::new(rows))
            })
            .await
    }
}

fn project_all<R: Rng + ?Sized>(rows: &[AbilityRow], rng: &mut R) -> Vec<AbilityWithChampion> {
    rows.iter().map(|row| project(row, rng)).collect()
}

fn project<R: Rng + ?Sized>(row: &AbilityRow, rng: &mut R) -> AbilityWithChampion {
    AbilityWithChampion {
        id: row.id,
        name: row.name.clone(),
        description: row.description.clone(),
        slot: row.slot,
        icon: row.icon.clone(),
        cooldowns: row.cooldowns.clone(),
        champion: ChampionSummary {
            id: row.champion_id,
            name: row.champion_name.clone(),
            icon: row.champion_icon.clone(),
            splash: row.splashes.choose(rng).cloned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::repository::{
        AbilityRecord, CatalogTotals, ChampionRecord, InMemoryCatalog, SkinRecord,
    };
    use async_trait::async_trait;
    use game_core::{ChampionId, Slot};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ability(slot: Slot, cooldowns: &[f64]) -> AbilityRecord {
        AbilityRecord {
            slot,
            name: format!("{slot} ability"),
            description: None,
            icon: None,
            cooldowns: cooldowns.to_vec(),
            affected_by_cdr: true,
            costs: Vec::new(),
        }
    }

    fn skin(riot_id: i64, splash: &str) -> SkinRecord {
        SkinRecord {
            riot_id,
            name: format!("skin {riot_id}"),
            is_base: riot_id % 1000 == 0,
            rarity: None,
            is_legacy: false,
            splash_path: splash.to_string(),
            tile_path: None,
        }
    }

    fn champion(riot_id: i64, abilities: Vec<AbilityRecord>, skins: Vec<SkinRecord>) -> ChampionRecord {
        ChampionRecord {
            riot_id,
            key: format!("Champ{riot_id}"),
            name: format!("Champion {riot_id}"),
            title: "the Tester".to_string(),
            icon: format!("/icons/{riot_id}.png"),
            roles: vec!["mage".to_string()],
            abilities,
            skins,
        }
    }

    /// Counts storage reads.
    struct CountingStore {
        inner: InMemoryCatalog,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl CatalogStore for CountingStore {
        async fn playable_abilities(&self) -> Result<Vec<AbilityRow>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.playable_abilities().await
        }

        async fn replace_champion(&self, record: &ChampionRecord) -> Result<ChampionId> {
            self.inner.replace_champion(record).await
        }

        async fn totals(&self) -> Result<CatalogTotals> {
            self.inner.totals().await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CatalogStore for BrokenStore {
        async fn playable_abilities(&self) -> Result<Vec<AbilityRow>> {
            Err(RepositoryError::CorruptedData("boom".to_string()))
        }

        async fn replace_champion(&self, _record: &ChampionRecord) -> Result<ChampionId> {
            Err(RepositoryError::CorruptedData("boom".to_string()))
        }

        async fn totals(&self) -> Result<CatalogTotals> {
            Ok(CatalogTotals::default())
        }
    }

    fn counting_store() -> Arc<CountingStore> {
        let records = vec![
            champion(
                1,
                vec![
                    ability(Slot::P, &[]),
                    ability(Slot::Q, &[8.0, 7.0, 6.0]),
                    ability(Slot::W, &[0.0, 0.0]),
                    ability(Slot::R, &[120.0, 100.0, 80.0]),
                ],
                vec![skin(1000, "/splash/a.jpg"), skin(1001, "/splash/b.jpg")],
            ),
            champion(2, vec![ability(Slot::E, &[12.0])], Vec::new()),
        ];
        Arc::new(CountingStore {
            inner: InMemoryCatalog::with_records(records).unwrap(),
            reads: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn filters_passives_and_zero_cooldowns() {
        let store = counting_store();
        let repo = AbilityRepository::new(store, AbilityRepository::DEFAULT_TTL);

        let abilities = repo.valid_abilities().await.unwrap();
        let mut slots: Vec<Slot> = abilities.iter().map(|a| a.slot).collect();
        slots.sort_by_key(|slot| slot.to_string());

        assert_eq!(slots, vec![Slot::E, Slot::Q, Slot::R]);
        assert!(abilities.iter().all(AbilityWithChampion::has_valid_cooldowns));
    }

    #[tokio::test]
    async fn splash_is_null_without_skins() {
        let repo = AbilityRepository::new(counting_store(), AbilityRepository::DEFAULT_TTL);
        let mut rng = StdRng::seed_from_u64(3);

        let abilities = repo.valid_abilities_with(&mut rng).await.unwrap();

        for ability in abilities {
            if ability.champion.name == "Champion 2" {
                assert_eq!(ability.champion.splash, None);
            } else {
                let splash = ability.champion.splash.unwrap();
                assert!(splash == "/splash/a.jpg" || splash == "/splash/b.jpg");
            }
        }
    }

    #[tokio::test]
    async fn storage_is_read_once_per_ttl_window() {
        let store = counting_store();
        let clock = Arc::new(ManualClock::new());
        let repo = AbilityRepository::with_clock(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            Duration::from_secs(3600),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );

        for _ in 0..5 {
            repo.valid_abilities().await.unwrap();
        }
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(3600));
        repo.valid_abilities().await.unwrap();
        assert_eq!(store.reads.load(Ordering::SeqCst), 2);

        repo.refresh().await;
        repo.valid_abilities().await.unwrap();
        assert_eq!(store.reads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn concurrent_readers_share_one_storage_read() {
        let store = counting_store();
        let repo = Arc::new(AbilityRepository::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            AbilityRepository::DEFAULT_TTL,
        ));

        let (a, b, c) = tokio::join!(
            repo.valid_abilities(),
            repo.valid_abilities(),
            repo.valid_abilities()
        );

        assert_eq!(a.unwrap().len(), 3);
        assert_eq!(b.unwrap().len(), 3);
        assert_eq!(c.unwrap().len(), 3);
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_scope_pins_one_projection() {
        let repo = AbilityRepository::new(counting_store(), AbilityRepository::DEFAULT_TTL);
        let scope = RequestScope::new();

        let first = repo.valid_abilities_in(&scope).await.unwrap().to_vec();
        let second = repo.valid_abilities_in(&scope).await.unwrap().to_vec();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let repo = AbilityRepository::new(Arc::new(BrokenStore), AbilityRepository::DEFAULT_TTL);

        let result = repo.valid_abilities().await;

        assert!(matches!(result, Err(RepositoryError::CorruptedData(_))));
    }
}
