//! Admin endpoints: login, logout and probability override editing

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use lucky_common::api::{AdminGroupSummary, LoginRequest, SuccessResponse, TokenResponse};
use lucky_common::models::OverrideMap;
use lucky_common::uuid_utils::parse_group_id;

use super::auth::admin_token;
use super::ApiError;
use crate::AppState;

/// POST /api/admin/login
///
/// Returns `{"token": "..."}`; any credential mismatch is 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;
    let token = state.admin.login(&request.username, &request.password)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/admin/logout
///
/// Revokes the presented token server-side.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<SuccessResponse> {
    if let Some(token) = admin_token(&headers) {
        state.admin.logout(token);
    }
    Json(SuccessResponse::ok())
}

/// GET /api/admin/probability/:group_id
///
/// Stored tier map; empty for groups without overrides.
pub async fn get_probability(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<OverrideMap>, ApiError> {
    // Unknown ids simply have no overrides
    let Ok(group_id) = parse_group_id(&group_id) else {
        return Ok(Json(OverrideMap::new()));
    };
    Ok(Json(state.repo.get_overrides(group_id).await?))
}

/// PUT /api/admin/probability/:group_id
///
/// Body: `{"<member name>": "fair" | "favored" | "suppressed", ...}`.
/// Replaces the whole map.
pub async fn put_probability(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    payload: Result<Json<OverrideMap>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let group_id = parse_group_id(&group_id)?;
    let Json(overrides) = payload?;
    state.repo.set_overrides(group_id, overrides).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/admin/groups
///
/// Minimal listing for the admin group picker.
pub async fn admin_list_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminGroupSummary>>, ApiError> {
    let groups = state.repo.list_groups().await?;
    Ok(Json(groups.into_iter().map(AdminGroupSummary::from).collect()))
}
