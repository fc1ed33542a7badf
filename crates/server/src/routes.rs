//! Route table and handlers.
use axum::Json;
use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use game_core::{AbilityId, Difficulty};
use runtime::{RequestScope, RoundBatch, RoundRequest};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/rounds", get(rounds))
        // Path used by earlier web clients
        .route("/api/game/random", get(rounds))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundsQuery {
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub exclude_id: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl From<RoundsQuery> for RoundRequest {
    fn from(query: RoundsQuery) -> Self {
        RoundRequest::new(query.score.unwrap_or(0))
            .with_count(query.count.unwrap_or(RoundRequest::DEFAULT_COUNT))
            .excluding(query.exclude_id.map(AbilityId))
            .with_difficulty(query.difficulty)
    }
}

async fn rounds(
    State(state): State<SharedState>,
    query: std::result::Result<Query<RoundsQuery>, QueryRejection>,
) -> Result<Json<RoundBatch>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadQuery(rejection.body_text()))?;
    let request = RoundRequest::from(query);

    let scope = RequestScope::new();
    let batch = state.rounds().generate_in(&scope, &request).await?;
    tracing::debug!(
        score = request.score,
        rounds = batch.rounds.len(),
        difficulty = %batch.difficulty,
        "served rounds"
    );
    Ok(Json(batch))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_uses_defaults() {
        let request = RoundRequest::from(RoundsQuery::default());

        assert_eq!(request, RoundRequest::new(0));
        assert_eq!(request.resolved_difficulty(), Difficulty::Beginner);
    }

    #[test]
    fn query_fields_carry_over() {
        let request = RoundRequest::from(RoundsQuery {
            score: Some(25),
            count: Some(9),
            exclude_id: Some(7),
            difficulty: Some(Difficulty::Expert),
        });

        assert_eq!(request.score, 25);
        assert_eq!(request.clamped_count(), RoundRequest::MAX_COUNT);
        assert_eq!(request.exclude_id, Some(AbilityId(7)));
        assert_eq!(request.resolved_difficulty(), Difficulty::Expert);
    }
}
