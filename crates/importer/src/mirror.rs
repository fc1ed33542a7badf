//! Local copy of champion artwork.
//!
//! Each asset URL maps to `<root>/<url path>`. Files already on disk are left
//! alone, so an interrupted run can simply be started again.

use std::path::{Component, Path, PathBuf};

use reqwest::Url;
use runtime::ChampionRecord;
use tokio::fs;

use crate::error::{ImportError, Result, SourceError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorOutcome {
    Downloaded,
    Skipped,
}

/// Per-run asset counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl MirrorStats {
    pub fn merge(&mut self, other: MirrorStats) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

#[derive(Clone, Debug)]
pub struct AssetMirror {
    root: PathBuf,
    http_client: reqwest::Client,
}

impl AssetMirror {
    pub fn new(root: impl Into<PathBuf>, http_client: reqwest::Client) -> Self {
        Self {
            root: root.into(),
            http_client,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination for `url`, rooted at the mirror directory.
    ///
    /// Only normal path segments are kept, so a URL can never escape the root.
    pub fn local_path(&self, url: &str) -> std::result::Result<PathBuf, SourceError> {
        let parsed =
            Url::parse(url).map_err(|err| SourceError::Malformed(format!("{url}: {err}")))?;

        let mut path = self.root.clone();
        let mut segments = 0;
        for component in Path::new(parsed.path()).components() {
            if let Component::Normal(segment) = component {
                path.push(segment);
                segments += 1;
            }
        }

        if segments == 0 {
            return Err(SourceError::Malformed(format!("{url} has no file path")));
        }
        Ok(path)
    }

    /// Downloads one asset unless it is already present.
    pub async fn mirror(&self, url: &str) -> Result<MirrorOutcome> {
        let path = self.local_path(url)?;
        if fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(MirrorOutcome::Skipped);
        }

        let bytes = self.download(url).await?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| asset_error(parent, source))?;
        }

        // Write to a sibling file and rename so a crash never leaves a partial asset
        let temp_path = path.with_extension("part");
        fs::write(&temp_path, &bytes)
            .await
            .map_err(|source| asset_error(&temp_path, source))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|source| asset_error(&path, source))?;

        tracing::debug!(url, path = %path.display(), bytes = bytes.len(), "mirrored asset");
        Ok(MirrorOutcome::Downloaded)
    }

    /// Mirrors every asset referenced by `record`.
    ///
    /// Individual failures are logged and counted; they never fail the champion.
    pub async fn mirror_record(&self, record: &ChampionRecord) -> MirrorStats {
        let mut stats = MirrorStats::default();
        for url in asset_urls(record) {
            match self.mirror(url).await {
                Ok(MirrorOutcome::Downloaded) => stats.downloaded += 1,
                Ok(MirrorOutcome::Skipped) => stats.skipped += 1,
                Err(err) => {
                    stats.failed += 1;
                    tracing::warn!(champion = %record.name, url, error = %err, "asset mirror failed");
                }
            }
        }
        stats
    }

    async fn download(&self, url: &str) -> std::result::Result<Vec<u8>, SourceError> {
        let http_error = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.http_client.get(url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(bytes.to_vec())
    }
}

fn asset_error(path: &Path, source: std::io::Error) -> ImportError {
    ImportError::Asset {
        path: path.to_path_buf(),
        source,
    }
}

/// Icons, splashes and tiles referenced by a champion record.
pub fn asset_urls(record: &ChampionRecord) -> Vec<&str> {
    let mut urls = vec![record.icon.as_str()];
    urls.extend(record.abilities.iter().filter_map(|a| a.icon.as_deref()));
    for skin in &record.skins {
        urls.push(skin.splash_path.as_str());
        urls.extend(skin.tile_path.as_deref());
    }
    urls.sort_unstable();
    urls.dedup();
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Slot;
    use runtime::{AbilityRecord, SkinRecord};
    use tempfile::TempDir;

    fn record() -> ChampionRecord {
        ChampionRecord {
            riot_id: 1,
            key: "Annie".to_string(),
            name: "Annie".to_string(),
            title: "the Dark Child".to_string(),
            icon: "https://cdn.example/game/v1/champion-icons/1.png".to_string(),
            roles: vec!["mage".to_string()],
            abilities: vec![
                AbilityRecord {
                    slot: Slot::P,
                    name: "Pyromania".to_string(),
                    description: None,
                    icon: None,
                    cooldowns: Vec::new(),
                    affected_by_cdr: true,
                    costs: Vec::new(),
                },
                AbilityRecord {
                    slot: Slot::Q,
                    name: "Disintegrate".to_string(),
                    description: None,
                    icon: Some("https://cdn.example/game/assets/annie_q.png".to_string()),
                    cooldowns: vec![4.0; 5],
                    affected_by_cdr: true,
                    costs: vec![60.0; 5],
                },
            ],
            skins: vec![SkinRecord {
                riot_id: 1000,
                name: "Annie".to_string(),
                is_base: true,
                rarity: None,
                is_legacy: false,
                splash_path: "https://cdn.example/game/assets/annie_splash_0.jpg".to_string(),
                tile_path: Some("https://cdn.example/game/assets/annie_tile_0.jpg".to_string()),
            }],
        }
    }

    #[test]
    fn url_path_maps_under_root() {
        let mirror = AssetMirror::new("/srv/assets", reqwest::Client::new());
        let path = mirror
            .local_path("https://cdn.example/game/assets/annie_q.png?v=2")
            .unwrap();

        assert_eq!(path, PathBuf::from("/srv/assets/game/assets/annie_q.png"));
    }

    #[test]
    fn parent_segments_cannot_escape_root() {
        let mirror = AssetMirror::new("/srv/assets", reqwest::Client::new());
        let path = mirror
            .local_path("https://cdn.example/a/%2e%2e/../b.png")
            .unwrap();

        assert!(path.starts_with("/srv/assets"));
        assert!(!path.components().any(|c| matches!(c, Component::ParentDir)));
    }

    #[test]
    fn relative_or_empty_urls_are_rejected() {
        let mirror = AssetMirror::new("/srv/assets", reqwest::Client::new());

        assert!(mirror.local_path("/lol-game-data/assets/x.png").is_err());
        assert!(mirror.local_path("https://cdn.example/").is_err());
    }

    #[test]
    fn record_urls_cover_icons_splashes_and_tiles() {
        let record = record();
        let urls = asset_urls(&record);

        assert_eq!(urls.len(), 4);
        assert!(urls.contains(&"https://cdn.example/game/v1/champion-icons/1.png"));
        assert!(urls.contains(&"https://cdn.example/game/assets/annie_tile_0.jpg"));
    }

    #[tokio::test]
    async fn existing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mirror = AssetMirror::new(dir.path(), reqwest::Client::new());
        let url = "https://cdn.example/game/assets/annie_q.png";

        let path = mirror.local_path(url).unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"png").unwrap();

        assert_eq!(mirror.mirror(url).await.unwrap(), MirrorOutcome::Skipped);
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
    }

    #[tokio::test]
    async fn record_failures_are_counted_not_raised() {
        let dir = TempDir::new().unwrap();
        let mirror = AssetMirror::new(dir.path(), reqwest::Client::new());
        let mut record = record();
        // Nothing listens on the discard port
        record.icon = "http://127.0.0.1:9/game/icon.png".to_string();
        record.abilities[1].icon = None;
        record.skins.clear();

        let stats = mirror.mirror_record(&record).await;

        assert_eq!(
            stats,
            MirrorStats {
                downloaded: 0,
                skipped: 0,
                failed: 1
            }
        );
        assert!(!dir.path().join("game/icon.png").exists());
    }
}
