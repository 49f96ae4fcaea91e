//! JSON file store
//!
//! Keeps the legacy on-disk layout: `groups.json` maps group id to the group
//! record and `probability.json` maps group id to its override map. Each file
//! is rewritten whole on every change through a temp file + fsync + rename, so
//! a failed write leaves the previous contents in place.
//!
//! A missing file means the store was never written and reads as empty. An
//! unreadable or unparseable file is an error, never an empty collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Store;
use crate::models::{Group, OverrideMap};
use crate::{Error, Result};

pub const GROUPS_FILE: &str = "groups.json";
pub const PROBABILITY_FILE: &str = "probability.json";

/// Group as stored in `groups.json`: the id is the map key, not a field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupRecord {
    group_name: String,
    members: Vec<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    last_used: Option<DateTime<Utc>>,
}

impl GroupRecord {
    fn into_group(self, id: Uuid) -> Group {
        Group {
            id,
            group_name: self.group_name,
            members: self.members,
            created_at: self.created_at,
            last_used: self.last_used,
        }
    }
}

impl From<&Group> for GroupRecord {
    fn from(group: &Group) -> Self {
        Self {
            group_name: group.group_name.clone(),
            members: group.members.clone(),
            created_at: group.created_at,
            last_used: group.last_used,
        }
    }
}

type GroupsDoc = BTreeMap<Uuid, GroupRecord>;
type OverridesDoc = BTreeMap<Uuid, OverrideMap>;

/// Result of reading a store file
#[derive(Debug, PartialEq)]
pub enum Loaded<T> {
    /// The file does not exist (or is blank): nothing was ever written
    Uninitialized,
    Present(T),
}

impl<T> Loaded<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Loaded::Present(_))
    }
}

impl<T: Default> Loaded<T> {
    pub fn unwrap_or_default(self) -> T {
        match self {
            Loaded::Uninitialized => T::default(),
            Loaded::Present(data) => data,
        }
    }
}

/// Handle to one JSON document on disk
pub struct JsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Loaded<T>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Uninitialized),
            Err(e) => return Err(Error::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Loaded::Uninitialized);
        }

        serde_json::from_str(&content)
            .map(Loaded::Present)
            .map_err(|source| Error::CorruptStore {
                path: self.path.clone(),
                source,
            })
    }

    /// Atomically replace the file contents
    pub async fn save(&self, data: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp_path = self.tmp_path();

        let result = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(Error::Io(e));
        }
        debug!("Wrote {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    async fn load_or_default(&self) -> Result<T> {
        Ok(self.load().await?.unwrap_or_default())
    }
}

/// Store backed by `groups.json` and `probability.json`
pub struct JsonFileStore {
    groups: JsonFile<GroupsDoc>,
    overrides: JsonFile<OverridesDoc>,
    /// Serializes read-modify-write cycles against the files
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating the folder if needed) and verify both files are readable
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let store = Self {
            groups: JsonFile::new(data_dir.join(GROUPS_FILE)),
            overrides: JsonFile::new(data_dir.join(PROBABILITY_FILE)),
            write_lock: Mutex::new(()),
        };

        for (path, loaded) in [
            (store.groups.path(), store.groups.load().await?.is_present()),
            (store.overrides.path(), store.overrides.load().await?.is_present()),
        ] {
            if loaded {
                info!("Opened existing store file: {}", path.display());
            } else {
                info!("Store file not yet initialized: {}", path.display());
            }
        }

        Ok(store)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self
            .groups
            .load_or_default()
            .await?
            .into_iter()
            .map(|(id, record)| record.into_group(id))
            .collect())
    }

    async fn get_group(&self, id: Uuid) -> Result<Option<Group>> {
        Ok(self
            .groups
            .load_or_default()
            .await?
            .remove(&id)
            .map(|record| record.into_group(id)))
    }

    async fn put_group(&self, group: &Group) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.groups.load_or_default().await?;
        doc.insert(group.id, GroupRecord::from(group));
        self.groups.save(&doc).await
    }

    async fn delete_group(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut groups = self.groups.load_or_default().await?;
        if groups.remove(&id).is_none() {
            return Ok(false);
        }

        // Group first: if the override write then fails, the caller sees the
        // error and only an orphaned override entry under a dead id remains.
        self.groups.save(&groups).await?;

        let mut overrides = self.overrides.load_or_default().await?;
        if overrides.remove(&id).is_some() {
            if let Err(e) = self.overrides.save(&overrides).await {
                warn!("Group {} deleted but its overrides were not: {}", id, e);
                return Err(e);
            }
        }
        Ok(true)
    }

    async fn get_overrides(&self, group_id: Uuid) -> Result<OverrideMap> {
        Ok(self
            .overrides
            .load_or_default()
            .await?
            .remove(&group_id)
            .unwrap_or_default())
    }

    async fn put_overrides(&self, group_id: Uuid, overrides: &OverrideMap) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.overrides.load_or_default().await?;
        doc.insert(group_id, overrides.clone());
        self.overrides.save(&doc).await
    }
}
