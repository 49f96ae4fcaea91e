//! # Lucky Wheel Common Library
//!
//! Shared code for the Lucky Wheel service including:
//! - Group and probability override data model
//! - Persistence store trait and its backends
//! - Group repository (validation, ordering, per-group locking)
//! - Probability resolver and weighted draw engine
//! - Admin session manager
//! - Configuration loading
//!
//! Nothing in here depends on the HTTP framework; the `lucky-wheel` crate
//! wraps these pieces with axum handlers.

pub mod api;
pub mod config;
pub mod draw;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::{Group, OverrideMap, Tier};
pub use repository::GroupRepository;
