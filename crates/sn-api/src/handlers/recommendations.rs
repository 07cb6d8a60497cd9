//! Friend, job and people rankings for one requester.
//!
//! The limit is validated here, before the engine is consulted. Every served
//! ranking and every backend failure is counted in the metrics registry.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use sn_common::api::{
    FriendRecommendation, JobRecommendation, LimitError, PersonSuggestion, RecommendationLimit,
};
use sn_common::{RecommendError, RecommendationEngine};
use sn_metrics::{record_ranking, record_ranking_error};

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    fn resolve(&self) -> Result<RecommendationLimit, LimitError> {
        self.limit
            .map_or(Ok(RecommendationLimit::default()), RecommendationLimit::new)
    }
}

fn respond<T>(
    kind: &'static str,
    result: Result<Vec<T>, RecommendError>,
) -> Result<Json<Vec<T>>, ApiError> {
    match result {
        Ok(items) => {
            record_ranking(kind, items.len());
            Ok(Json(items))
        }
        Err(err) => {
            if matches!(err, RecommendError::Graph(_)) {
                record_ranking_error(kind);
            }
            Err(err.into())
        }
    }
}

pub async fn friends(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Vec<FriendRecommendation>>, ApiError> {
    let Query(params) = params?;
    let limit = params.resolve()?;
    let engine = RecommendationEngine::new(&state.backend);
    respond("friends", engine.rank_friends(&user_id, limit).await)
}

pub async fn jobs(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Vec<JobRecommendation>>, ApiError> {
    let Query(params) = params?;
    let limit = params.resolve()?;
    let engine = RecommendationEngine::new(&state.backend);
    respond("jobs", engine.rank_jobs(&user_id, limit).await)
}

pub async fn people(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Vec<PersonSuggestion>>, ApiError> {
    let Query(params) = params?;
    let limit = params.resolve()?;
    let engine = RecommendationEngine::new(&state.backend);
    respond("people", engine.rank_people(&user_id, limit).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        let params = LimitParams::default();
        assert_eq!(params.resolve().unwrap().get(), 10);
    }

    #[test]
    fn out_of_range_limit_is_rejected() {
        assert_eq!(
            LimitParams { limit: Some(0) }.resolve(),
            Err(LimitError(0))
        );
        assert_eq!(
            LimitParams { limit: Some(51) }.resolve(),
            Err(LimitError(51))
        );
        assert_eq!(LimitParams { limit: Some(50) }.resolve().unwrap().get(), 50);
    }
}
