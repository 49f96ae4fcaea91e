//! Shared API request/response bodies
//!
//! Group bodies reuse [`crate::models`] directly; these are the remaining
//! wire shapes the front end exchanges with the service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Group;

/// POST /api/admin/login body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `{"success": true}` marker for operations with nothing else to return
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error body: `{"error": "<message>"}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Minimal group listing for the admin group picker
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGroupSummary {
    pub id: Uuid,
    pub group_name: String,
    pub members: Vec<String>,
}

impl From<Group> for AdminGroupSummary {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            group_name: group.group_name,
            members: group.members,
        }
    }
}
