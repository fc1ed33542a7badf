//! Where a session gets its rounds from.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{RoundBatch, RoundRequest, RoundService};
use crate::api::{Result, RuntimeError};

/// Supplier of round batches for the session worker.
#[async_trait]
pub trait RoundSource: Send + Sync {
    async fn fetch_rounds(&self, request: &RoundRequest) -> Result<RoundBatch>;
}

/// Generates rounds in-process.
#[derive(Clone)]
pub struct LocalRoundSource {
    service: Arc<RoundService>,
}

impl LocalRoundSource {
    pub fn new(service: Arc<RoundService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RoundSource for LocalRoundSource {
    async fn fetch_rounds(&self, request: &RoundRequest) -> Result<RoundBatch> {
        self.service.generate(request).await
    }
}

/// Calls a remote `GET /rounds` endpoint.
#[derive(Clone, Debug)]
pub struct HttpRoundSource {
    base_url: String,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpRoundSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query(request: &RoundRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("score", request.score.to_string()),
            ("count", request.clamped_count().to_string()),
        ];
        if let Some(id) = request.exclude_id {
            query.push(("excludeId", id.to_string()));
        }
        if let Some(difficulty) = request.difficulty {
            query.push(("difficulty", difficulty.to_string()));
        }
        query
    }
}

#[async_trait]
impl RoundSource for HttpRoundSource {
    async fn fetch_rounds(&self, request: &RoundRequest) -> Result<RoundBatch> {
        let url = format!("{}/rounds", self.base_url);
        tracing::debug!(%url, score = request.score, "requesting rounds");

        let response = self
            .http_client
            .get(&url)
            .query(&Self::query(request))
            .send()
            .await
            .map_err(RuntimeError::RoundFetch)?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            };
            return Err(RuntimeError::RoundApi {
                status: status.as_u16(),
                message,
            });
        }

        let batch: RoundBatch = response.json().await.map_err(RuntimeError::RoundFetch)?;
        if batch.rounds.is_empty() {
            return Err(RuntimeError::EmptyBatch);
        }
        Ok(batch)
    }
}
