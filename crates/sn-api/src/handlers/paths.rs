use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use sn_common::GraphQuery;
use sn_common::api::ShortestPath;
use tracing::debug;

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct PathParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

fn required(name: &str, value: Option<String>) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("query parameter `{name}` is required")))
}

pub async fn shortest(
    State(state): State<SharedState>,
    params: Result<Query<PathParams>, QueryRejection>,
) -> Result<Json<ShortestPath>, ApiError> {
    let Query(params) = params?;
    let from = required("from", params.from)?;
    let to = required("to", params.to)?;

    if from == to {
        return Err(ApiError::BadRequest(
            "from and to must be different users".into(),
        ));
    }

    let nodes = state.backend.shortest_path(&from, &to).await?;
    let path = ShortestPath::from_nodes(from, to, nodes);
    debug!(exists = path.exists, hops = path.path_length, "shortest path resolved");

    Ok(Json(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_parameters_are_missing() {
        assert!(required("from", None).is_err());
        assert!(required("from", Some("   ".into())).is_err());
        assert_eq!(required("from", Some(" u1 ".into())).unwrap(), "u1");
    }
}
