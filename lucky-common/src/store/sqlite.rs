//! SQLite store via sqlx
//!
//! Members are stored as a JSON array column; overrides get one row per
//! (group, member name). Cascading delete and override replacement each run
//! in a single transaction.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use super::Store;
use crate::models::{Group, OverrideMap, Tier};
use crate::{time, uuid_utils, Result};

pub const DB_FILE_NAME: &str = "lucky.db";

/// Store backed by a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        // WAL lets readers proceed while a draw or edit is writing
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    /// Private in-memory database
    ///
    /// Limited to one connection: every `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                id TEXT PRIMARY KEY,
                group_name TEXT NOT NULL,
                members TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                last_used INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS probability_overrides (
                group_id TEXT NOT NULL,
                member_name TEXT NOT NULL,
                tier TEXT NOT NULL,
                PRIMARY KEY (group_id, member_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn decode_error(e: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

fn row_to_group(row: &SqliteRow) -> Result<Group> {
    let id: String = row.try_get("id")?;
    let members: String = row.try_get("members")?;
    let created_at: i64 = row.try_get("created_at")?;
    let last_used: Option<i64> = row.try_get("last_used")?;

    Ok(Group {
        id: uuid_utils::parse(&id).map_err(decode_error)?,
        group_name: row.try_get("group_name")?,
        members: serde_json::from_str(&members).map_err(decode_error)?,
        created_at: time::from_millis(created_at),
        last_used: last_used.map(time::from_millis),
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        let rows = sqlx::query(
            "SELECT id, group_name, members, created_at, last_used FROM groups ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_group).collect()
    }

    async fn get_group(&self, id: Uuid) -> Result<Option<Group>> {
        let row = sqlx::query(
            "SELECT id, group_name, members, created_at, last_used FROM groups WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_group).transpose()
    }

    async fn put_group(&self, group: &Group) -> Result<()> {
        let members = serde_json::to_string(&group.members)?;

        sqlx::query(
            r#"
            INSERT INTO groups (id, group_name, members, created_at, last_used)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                group_name = excluded.group_name,
                members = excluded.members,
                last_used = excluded.last_used
            "#,
        )
        .bind(group.id.to_string())
        .bind(&group.group_name)
        .bind(members)
        .bind(group.created_at.timestamp_millis())
        .bind(group.last_used.map(|t| t.timestamp_millis()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_group(&self, id: Uuid) -> Result<bool> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM probability_overrides WHERE group_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted > 0)
    }

    async fn get_overrides(&self, group_id: Uuid) -> Result<OverrideMap> {
        let rows = sqlx::query(
            "SELECT member_name, tier FROM probability_overrides WHERE group_id = ?",
        )
        .bind(group_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut overrides = OverrideMap::new();
        for row in rows {
            let name: String = row.try_get("member_name")?;
            let tier: String = row.try_get("tier")?;
            let tier: Tier = tier.parse().map_err(decode_error)?;
            overrides.insert(name, tier);
        }
        Ok(overrides)
    }

    async fn put_overrides(&self, group_id: Uuid, overrides: &OverrideMap) -> Result<()> {
        let group_id = group_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM probability_overrides WHERE group_id = ?")
            .bind(&group_id)
            .execute(&mut *tx)
            .await?;

        for (name, tier) in overrides {
            sqlx::query(
                "INSERT INTO probability_overrides (group_id, member_name, tier) VALUES (?, ?, ?)",
            )
            .bind(&group_id)
            .bind(name)
            .bind(tier.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
