//! Persistence store for groups and probability overrides
//!
//! The [`Store`] trait is the key-value boundary the repository talks to.
//! Every method is a single atomic operation: it either completes durably or
//! fails without changing the persisted state.
//!
//! Backends:
//! - [`SqliteStore`]: SQLite database via sqlx (default)
//! - [`JsonFileStore`]: `groups.json` + `probability.json` in the data folder
//! - [`MemoryStore`]: process-local maps

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::StorageBackend;
use crate::models::{Group, OverrideMap};
use crate::Result;

pub mod json_file;
pub mod memory;
#[cfg(feature = "sqlx")]
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
#[cfg(feature = "sqlx")]
pub use sqlite::SqliteStore;

/// Durable key-value storage of groups and their override maps
#[async_trait]
pub trait Store: Send + Sync {
    /// All groups, in the store's natural enumeration order
    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn get_group(&self, id: Uuid) -> Result<Option<Group>>;

    /// Insert or replace the group stored under `group.id`
    async fn put_group(&self, group: &Group) -> Result<()>;

    /// Remove a group together with its override map
    ///
    /// Returns `false` if no group was stored under `id`.
    async fn delete_group(&self, id: Uuid) -> Result<bool>;

    /// Override map for a group; empty when none was ever written
    async fn get_overrides(&self, group_id: Uuid) -> Result<OverrideMap>;

    /// Replace the whole override map for a group
    async fn put_overrides(&self, group_id: Uuid, overrides: &OverrideMap) -> Result<()>;
}

/// Open the configured backend rooted at `data_dir`
pub async fn open(backend: StorageBackend, data_dir: &Path) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match backend {
        #[cfg(feature = "sqlx")]
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&data_dir.join(sqlite::DB_FILE_NAME)).await?),
        #[cfg(not(feature = "sqlx"))]
        StorageBackend::Sqlite => {
            return Err(crate::Error::Config(
                "sqlite backend requires the `sqlx` feature".to_string(),
            ))
        }
        StorageBackend::Json => Arc::new(JsonFileStore::open(data_dir).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
