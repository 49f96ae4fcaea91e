//! HTTP API handlers for lucky-wheel

pub mod admin;
pub mod auth;
pub mod buildinfo;
pub mod draw;
pub mod error;
pub mod groups;
pub mod health;

pub use admin::{admin_list_groups, get_probability, login, logout, put_probability};
pub use auth::admin_auth_middleware;
pub use buildinfo::get_build_info;
pub use draw::draw;
pub use error::ApiError;
pub use groups::{create_group, delete_group, get_group, list_groups, update_group};
pub use health::health_routes;
