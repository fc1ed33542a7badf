//! SQLite-backed catalog store.
//!
//! Array columns (`roles`, `cooldowns`, `costs`) are stored as JSON text. The
//! schema is created on connect and every statement is idempotent.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use game_core::{AbilityId, ChampionId, Slot};
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::error::{RepositoryError, Result};
use super::traits::CatalogStore;
use super::types::{AbilityRow, CatalogTotals, ChampionRecord};

const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS champions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        riot_id INTEGER NOT NULL UNIQUE,
        key TEXT NOT NULL,
        name TEXT NOT NULL,
        title TEXT NOT NULL,
        icon TEXT NOT NULL,
        roles TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS abilities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        champion_id INTEGER NOT NULL REFERENCES champions(id) ON DELETE CASCADE,
        slot TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        icon TEXT,
        cooldowns TEXT NOT NULL DEFAULT '[]',
        affected_by_cdr INTEGER NOT NULL DEFAULT 1,
        costs TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS skins (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        champion_id INTEGER NOT NULL REFERENCES champions(id) ON DELETE CASCADE,
        riot_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        is_base INTEGER NOT NULL DEFAULT 0,
        rarity TEXT,
        is_legacy INTEGER NOT NULL DEFAULT 0,
        splash_path TEXT NOT NULL,
        tile_path TEXT
    )",
    "CREATE INDEX IF NOT EXISTS abilities_champion_id ON abilities(champion_id)",
    "CREATE INDEX IF NOT EXISTS skins_champion_id ON skins(champion_id)",
];

const PLAYABLE_ABILITIES: &str = "
    SELECT a.id, a.name, a.description, a.slot, a.icon, a.cooldowns,
           c.id AS champion_id, c.name AS champion_name, c.icon AS champion_icon
    FROM abilities a
    JOIN champions c ON c.id = a.champion_id
    WHERE a.slot IN ('Q', 'W', 'E', 'R') AND a.cooldowns <> '[]'
    ORDER BY a.id";

const UPSERT_CHAMPION: &str = "
    INSERT INTO champions (riot_id, key, name, title, icon, roles)
    VALUES (?, ?, ?, ?, ?, ?)
    ON CONFLICT(riot_id) DO UPDATE SET
        key = excluded.key,
        name = excluded.name,
        title = excluded.title,
        icon = excluded.icon,
        roles = excluded.roles
    RETURNING id";

#[derive(FromRow)]
struct PlayableRow {
    id: i64,
    name: String,
    description: Option<String>,
    slot: String,
    icon: Option<String>,
    cooldowns: String,
    champion_id: i64,
    champion_name: String,
    champion_icon: String,
}

#[derive(FromRow)]
struct SplashRow {
    champion_id: i64,
    splash_path: String,
}

/// [`CatalogStore`] over a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Opens (creating if missing) the database at `url` and ensures the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let catalog = Self { pool };
        catalog.ensure_schema().await?;
        Ok(catalog)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn splashes_by_champion(&self) -> Result<HashMap<i64, Vec<String>>> {
        let rows: Vec<SplashRow> =
            sqlx::query_as("SELECT champion_id, splash_path FROM skins ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let mut splashes: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            splashes
                .entry(row.champion_id)
                .or_default()
                .push(row.splash_path);
        }
        Ok(splashes)
    }
}

/// Default database location under the platform data directory.
///
/// Falls back to `./data` when no home directory can be resolved.
pub fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "cooldown-clash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
        .join("catalog.db")
}

/// `sqlite://` URL for [`default_database_path`].
pub fn default_database_url() -> String {
    format!("sqlite://{}", default_database_path().display())
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn playable_abilities(&self) -> Result<Vec<AbilityRow>> {
        let rows: Vec<PlayableRow> = sqlx::query_as(PLAYABLE_ABILITIES)
            .fetch_all(&self.pool)
            .await?;
        let splashes = self.splashes_by_champion().await?;

        rows.into_iter()
            .map(|row| -> Result<AbilityRow> {
                let slot = Slot::from_str(&row.slot).map_err(|_| {
                    RepositoryError::CorruptedData(format!(
                        "ability {} has unknown slot {:?}",
                        row.id, row.slot
                    ))
                })?;
                let cooldowns: Vec<f64> = serde_json::from_str(&row.cooldowns)?;
                let champion_splashes = splashes
                    .get(&row.champion_id)
                    .cloned()
                    .unwrap_or_default();

                Ok(AbilityRow {
                    id: AbilityId(row.id),
                    name: row.name,
                    description: row.description,
                    slot,
                    icon: row.icon,
                    cooldowns,
                    champion_id: ChampionId(row.champion_id),
                    champion_name: row.champion_name,
                    champion_icon: row.champion_icon,
                    splashes: champion_splashes,
                })
            })
            .collect()
    }

    async fn replace_champion(&self, record: &ChampionRecord) -> Result<ChampionId> {
        let mut tx = self.pool.begin().await?;

        let champion_id: i64 = sqlx::query_scalar(UPSERT_CHAMPION)
            .bind(record.riot_id)
            .bind(&record.key)
            .bind(&record.name)
            .bind(&record.title)
            .bind(&record.icon)
            .bind(serde_json::to_string(&record.roles)?)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM abilities WHERE champion_id = ?")
            .bind(champion_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM skins WHERE champion_id = ?")
            .bind(champion_id)
            .execute(&mut *tx)
            .await?;

        for ability in &record.abilities {
            sqlx::query(
                "INSERT INTO abilities
                    (champion_id, slot, name, description, icon, cooldowns, affected_by_cdr, costs)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(champion_id)
            .bind(ability.slot.to_string())
            .bind(&ability.name)
            .bind(&ability.description)
            .bind(&ability.icon)
            .bind(serde_json::to_string(&ability.cooldowns)?)
            .bind(ability.affected_by_cdr)
            .bind(serde_json::to_string(&ability.costs)?)
            .execute(&mut *tx)
            .await?;
        }

        for skin in &record.skins {
            sqlx::query(
                "INSERT INTO skins
                    (champion_id, riot_id, name, is_base, rarity, is_legacy, splash_path, tile_path)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(champion_id)
            .bind(skin.riot_id)
            .bind(&skin.name)
            .bind(skin.is_base)
            .bind(&skin.rarity)
            .bind(skin.is_legacy)
            .bind(&skin.splash_path)
            .bind(&skin.tile_path)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(ChampionId(champion_id))
    }

    async fn totals(&self) -> Result<CatalogTotals> {
        let (champions, abilities, skins): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM champions),
                (SELECT COUNT(*) FROM abilities),
                (SELECT COUNT(*) FROM skins)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogTotals {
            champions: champions.max(0) as u64,
            abilities: abilities.max(0) as u64,
            skins: skins.max(0) as u64,
        })
    }
}
