//! The import loop.
//!
//! Champions are processed one at a time: fetch, normalize, persist, then
//! optionally mirror artwork. A failure is recorded against the champion and
//! the loop moves on; only a failed champion list aborts the run.

use std::sync::Arc;
use std::time::Duration;

use runtime::{CatalogStore, CatalogTotals};

use crate::error::{ImportError, Result};
use crate::mirror::{AssetMirror, MirrorStats};
use crate::source::{ChampionRef, ChampionSource};

/// Pause between champions so the upstream CDN is not hammered.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// One champion that could not be imported.
#[derive(Debug)]
pub struct ImportFailure {
    pub champion: String,
    pub error: ImportError,
}

/// Outcome of a full run.
#[derive(Debug)]
pub struct ImportReport {
    pub source: &'static str,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<ImportFailure>,
    pub totals: CatalogTotals,
    pub assets: MirrorStats,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Writes the tally, each failure and the catalog totals to the log.
    pub fn log_summary(&self) {
        tracing::info!(
            source = self.source,
            succeeded = self.succeeded,
            failed = self.failures.len(),
            "import finished: {} ok, {} failed",
            self.succeeded,
            self.failures.len()
        );
        for failure in &self.failures {
            tracing::warn!("  {}: {}", failure.champion, error_chain(&failure.error));
        }
        tracing::info!(
            champions = self.totals.champions,
            abilities = self.totals.abilities,
            skins = self.totals.skins,
            "catalog totals"
        );
        if self.assets.total() > 0 {
            tracing::info!(
                downloaded = self.assets.downloaded,
                skipped = self.assets.skipped,
                failed = self.assets.failed,
                "asset mirror"
            );
        }
    }
}

pub struct Seeder {
    source: Arc<dyn ChampionSource>,
    store: Arc<dyn CatalogStore>,
    mirror: Option<AssetMirror>,
    delay: Duration,
    limit: Option<usize>,
}

impl Seeder {
    pub fn new(source: Arc<dyn ChampionSource>, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            source,
            store,
            mirror: None,
            delay: DEFAULT_DELAY,
            limit: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_mirror(mut self, mirror: AssetMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Imports only the first `limit` champions of the list.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub async fn run(&self) -> Result<ImportReport> {
        let mut champions = self
            .source
            .champion_list()
            .await
            .map_err(ImportError::ChampionList)?;
        if let Some(limit) = self.limit {
            champions.truncate(limit);
        }

        let total = champions.len();
        tracing::info!(source = self.source.name(), total, "importing champions");

        let mut succeeded = 0;
        let mut failures = Vec::new();
        let mut assets = MirrorStats::default();

        for (index, champion) in champions.iter().enumerate() {
            let position = index + 1;
            match self.import_one(champion).await {
                Ok(stats) => {
                    succeeded += 1;
                    assets.merge(stats);
                    tracing::info!("[{position}/{total}] ok {}", champion.name);
                }
                Err(error) => {
                    tracing::warn!(
                        "[{position}/{total}] failed {}: {}",
                        champion.name,
                        error_chain(&error)
                    );
                    failures.push(ImportFailure {
                        champion: champion.name.clone(),
                        error,
                    });
                }
            }

            if position < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let totals = self.store.totals().await?;

        Ok(ImportReport {
            source: self.source.name(),
            attempted: total,
            succeeded,
            failures,
            totals,
            assets,
        })
    }

    async fn import_one(&self, champion: &ChampionRef) -> Result<MirrorStats> {
        let record = self.source.champion(champion).await?;
        let id = self.store.replace_champion(&record).await?;
        tracing::debug!(
            champion = %record.name,
            id = id.0,
            abilities = record.abilities.len(),
            skins = record.skins.len(),
            "champion stored"
        );

        Ok(match &self.mirror {
            Some(mirror) => mirror.mirror_record(&record).await,
            None => MirrorStats::default(),
        })
    }
}

/// `error: cause: cause` on one line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
