//! In-memory store

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::models::{Group, OverrideMap};
use crate::Result;

#[derive(Default)]
struct Inner {
    groups: BTreeMap<Uuid, Group>,
    overrides: HashMap<Uuid, OverrideMap>,
}

/// Store that lives only as long as the process
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.inner.read().await.groups.values().cloned().collect())
    }

    async fn get_group(&self, id: Uuid) -> Result<Option<Group>> {
        Ok(self.inner.read().await.groups.get(&id).cloned())
    }

    async fn put_group(&self, group: &Group) -> Result<()> {
        self.inner.write().await.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn delete_group(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let existed = inner.groups.remove(&id).is_some();
        inner.overrides.remove(&id);
        Ok(existed)
    }

    async fn get_overrides(&self, group_id: Uuid) -> Result<OverrideMap> {
        Ok(self
            .inner
            .read()
            .await
            .overrides
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn put_overrides(&self, group_id: Uuid, overrides: &OverrideMap) -> Result<()> {
        self.inner
            .write()
            .await
            .overrides
            .insert(group_id, overrides.clone());
        Ok(())
    }
}
