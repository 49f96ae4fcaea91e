//! API-facing pieces shared with the HTTP service
//!
//! Contains only framework-independent code: the admin session manager and
//! the request/response bodies. The `lucky-wheel` crate wraps these with axum
//! handlers and middleware.

pub mod auth;
pub mod types;

pub use auth::{AdminAuth, AdminCredentials, AdminSession, SessionStore, SingleSlotSessionStore};
pub use types::{AdminGroupSummary, ErrorResponse, LoginRequest, SuccessResponse, TokenResponse};

/// Request header carrying the admin bearer token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
