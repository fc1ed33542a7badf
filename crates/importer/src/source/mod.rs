//! Upstream champion data sources.
//!
//! Two schema variants are supported: CDragon (raw client data, per-rank
//! coefficient arrays, client-relative asset paths) and Meraki (curated data
//! with cooldown modifier arrays and absolute asset URLs). Both map into the
//! same [`ChampionRecord`].

pub mod cdragon;
pub mod meraki;

pub use cdragon::CDragonSource;
pub use meraki::MerakiSource;

use async_trait::async_trait;
use runtime::ChampionRecord;
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Entry of the upstream champion list.
#[derive(Clone, Debug, PartialEq)]
pub struct ChampionRef {
    pub id: i64,
    /// Upstream alias, used by sources that key documents by name.
    pub key: String,
    pub name: String,
    /// Square portrait as listed in the summary, when the list carries it.
    pub icon: Option<String>,
}

#[async_trait]
pub trait ChampionSource: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Every playable champion.
    async fn champion_list(&self) -> Result<Vec<ChampionRef>, SourceError>;

    /// Full record for one champion.
    async fn champion(&self, champion: &ChampionRef) -> Result<ChampionRecord, SourceError>;
}

/// Thin JSON-over-HTTP helper shared by the sources.
#[derive(Clone, Debug, Default)]
pub(crate) struct JsonClient {
    http_client: reqwest::Client,
}

impl JsonClient {
    pub(crate) fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Read the body first so decode errors can name the document
        let body = response.text().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;
        tracing::trace!(url, bytes = body.len(), "fetched document");

        serde_json::from_str(&body).map_err(|source| SourceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
