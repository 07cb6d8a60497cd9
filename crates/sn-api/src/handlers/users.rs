use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Deserialize;
use sn_common::UserRepository;
use sn_common::api::{ConnectionRequest, ConnectionResponse, User, UserCreate, UserResponse};
use tracing::info;

use crate::SharedState;
use crate::error::ApiError;

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 1000;

fn default_list_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub fn validate_pagination(limit: i64, offset: i64) -> Result<(i64, i64), ApiError> {
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ApiError::Unprocessable(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }

    if offset < 0 {
        return Err(ApiError::Unprocessable("offset must not be negative".into()));
    }

    Ok((limit, offset))
}

pub async fn create_user(
    State(state): State<SharedState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let payload = payload.normalized();
    payload.validate()?;

    let user = state.backend.create_user(&payload).await?;
    info!(user_id = %user.user_id, skills = user.skills.len(), "user created");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    state
        .backend
        .get_user(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {user_id}")))
}

pub async fn list_users(
    State(state): State<SharedState>,
    params: Result<Query<ListUsersParams>, QueryRejection>,
) -> Result<Json<Vec<User>>, ApiError> {
    let Query(params) = params?;
    let (limit, offset) = validate_pagination(params.limit, params.offset)?;
    let users = state.backend.list_users(limit, offset).await?;
    Ok(Json(users))
}

pub async fn connect_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    Json(request): Json<ConnectionRequest>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let other_id = request.user_id.trim().to_string();
    if other_id.is_empty() {
        return Err(ApiError::Unprocessable("user_id: must not be empty".into()));
    }

    let created = state.backend.connect_users(&user_id, &other_id).await?;
    if created {
        info!(%user_id, connected_user_id = %other_id, "connection created");
    }

    Ok(Json(ConnectionResponse {
        user_id,
        connected_user_id: other_id,
        created,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds() {
        assert_eq!(validate_pagination(1, 0).unwrap(), (1, 0));
        assert_eq!(validate_pagination(1000, 5).unwrap(), (1000, 5));
        assert!(validate_pagination(0, 0).is_err());
        assert!(validate_pagination(1001, 0).is_err());
        assert!(validate_pagination(10, -1).is_err());
    }
}
