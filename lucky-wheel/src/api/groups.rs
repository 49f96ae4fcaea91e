//! Group CRUD endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use lucky_common::api::SuccessResponse;
use lucky_common::models::{Group, GroupUpdate, NewGroup};
use lucky_common::uuid_utils::parse_group_id;

use super::ApiError;
use crate::AppState;

/// GET /api/groups
///
/// All groups, most recently used first.
pub async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(state.repo.list_groups().await?))
}

/// POST /api/groups
///
/// Body: `{"groupName": "...", "members": ["...", ...]}`. Returns 201 with
/// the stored group, or 400 when the body or its contents are invalid.
pub async fn create_group(
    State(state): State<AppState>,
    payload: Result<Json<NewGroup>, JsonRejection>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let Json(new_group) = payload?;
    let group = state.repo.create_group(new_group).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/groups/:id
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let id = parse_group_id(&id)?;
    Ok(Json(state.repo.get_group(id).await?))
}

/// PUT /api/groups/:id
///
/// Body fields are optional; omitted ones keep their stored value.
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GroupUpdate>, JsonRejection>,
) -> Result<Json<Group>, ApiError> {
    let id = parse_group_id(&id)?;
    let Json(update) = payload?;
    Ok(Json(state.repo.update_group(id, update).await?))
}

/// DELETE /api/groups/:id
///
/// Also removes the group's probability overrides.
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_group_id(&id)?;
    state.repo.delete_group(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
