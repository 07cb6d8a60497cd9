use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use sn_common::GraphAnalytics;
use sn_common::api::{NaturalQueryRequest, NaturalQueryResponse};
use sn_common::insights::NetworkInsights;
use sn_common::query_templates::{example_queries, translate};
use tracing::info;

use crate::SharedState;
use crate::error::ApiError;

const MAX_QUERY_LEN: usize = 500;

pub async fn natural_query(
    State(state): State<SharedState>,
    Json(request): Json<NaturalQueryRequest>,
) -> Result<Json<NaturalQueryResponse>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::Unprocessable("query: must not be empty".into()));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ApiError::Unprocessable(format!(
            "query: must be at most {MAX_QUERY_LEN} characters"
        )));
    }

    let template = translate(query, request.user_id.as_deref());
    let output = state.backend.run_template(&template).await?;
    info!(
        query_type = template.query_type(),
        rows = output.rows.len(),
        "template query executed"
    );

    Ok(Json(NaturalQueryResponse {
        natural_query: request.query.clone(),
        statement: output.statement,
        results: output.rows,
        explanation: template.explanation(),
        query_type: template.query_type().to_string(),
    }))
}

pub async fn examples() -> Json<serde_json::Value> {
    Json(json!({
        "examples": example_queries(),
        "note": "Queries are matched against built-in templates; anything else returns a sample of users.",
    }))
}

pub async fn insights(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<NetworkInsights>, ApiError> {
    state
        .backend
        .network_snapshot(&user_id)
        .await?
        .map(|snapshot| Json(NetworkInsights::from(snapshot)))
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {user_id}")))
}
