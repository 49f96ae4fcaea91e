//! Admin token middleware
//!
//! Protected routes require the `X-Admin-Token` header to carry the current,
//! unexpired admin session token. Anything else is 401.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use lucky_common::api::ADMIN_TOKEN_HEADER;
use lucky_common::Error;

use super::ApiError;
use crate::AppState;

/// Token presented in the request headers, if any
pub fn admin_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
}

/// Authentication middleware for admin routes
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = admin_token(request.headers()).ok_or(Error::Unauthorized)?;
    state.admin.authenticate(token)?;

    Ok(next.run(request).await)
}
