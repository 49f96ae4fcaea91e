//! Draw endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use lucky_common::models::DrawOutcome;
use lucky_common::uuid_utils::parse_group_id;

use super::ApiError;
use crate::AppState;

/// POST /api/draw/:group_id
///
/// Picks a winner using the group's probability overrides and marks the
/// group as just used. The response carries the member list so the front
/// end can animate without a second request.
pub async fn draw(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<DrawOutcome>, ApiError> {
    let group_id = parse_group_id(&group_id)?;
    let outcome = state.repo.draw(group_id, state.rng.as_ref()).await?;
    Ok(Json(outcome))
}
