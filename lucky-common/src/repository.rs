//! Group repository
//!
//! CRUD over groups plus the draw flow, on top of any [`Store`]. The
//! repository is the validation boundary: every group it writes has a
//! non-empty name and at least two distinct, non-empty members.
//!
//! Each read-modify-write of one group (update, delete, override edit, draw)
//! holds that group's async mutex, so concurrent edits of the same group
//! cannot lose each other's writes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};
use uuid::Uuid;

use crate::draw::{self, RandomSource};
use crate::models::{DrawOutcome, Group, GroupUpdate, NewGroup, OverrideMap};
use crate::store::Store;
use crate::time::{Clock, SystemClock};
use crate::{uuid_utils, Error, Result};

/// Smallest member list a group may have
pub const MIN_MEMBERS: usize = 2;

/// One async mutex per group id
#[derive(Default)]
struct GroupLocks {
    inner: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl GroupLocks {
    async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the entry for a group that no longer exists
    fn forget(&self, id: Uuid) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }
}

/// Repository over groups and their probability overrides
pub struct GroupRepository {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    locks: GroupLocks,
}

impl GroupRepository {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: GroupLocks::default(),
        }
    }

    /// Repository using the wall clock
    pub fn with_system_clock(store: Arc<dyn Store>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// All groups, most recently used first
    ///
    /// Groups with equal timestamps keep the store's enumeration order.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let mut groups = self.store.list_groups().await?;
        groups.sort_by(|a, b| b.last_used_millis().cmp(&a.last_used_millis()));
        Ok(groups)
    }

    pub async fn create_group(&self, new_group: NewGroup) -> Result<Group> {
        validate_group_name(&new_group.group_name)?;
        validate_members(&new_group.members)?;

        let now = self.clock.now();
        let group = Group {
            id: uuid_utils::generate(),
            group_name: new_group.group_name,
            members: new_group.members,
            created_at: now,
            last_used: Some(now),
        };
        self.store.put_group(&group).await?;

        info!(
            "Created group {} '{}' with {} members",
            group.id,
            group.group_name,
            group.members.len()
        );
        Ok(group)
    }

    pub async fn get_group(&self, id: Uuid) -> Result<Group> {
        self.store
            .get_group(id)
            .await?
            .ok_or_else(|| Error::group_not_found(id))
    }

    /// Replace the provided fields and refresh `last_used`
    pub async fn update_group(&self, id: Uuid, update: GroupUpdate) -> Result<Group> {
        let _guard = self.locks.acquire(id).await;
        let mut group = self.fetch_locked(id).await?;

        if let Some(name) = update.group_name {
            validate_group_name(&name)?;
            group.group_name = name;
        }
        if let Some(members) = update.members {
            validate_members(&members)?;
            group.members = members;
        }
        group.last_used = Some(self.clock.now());

        self.store.put_group(&group).await?;
        info!("Updated group {} '{}'", group.id, group.group_name);
        Ok(group)
    }

    /// Delete a group and its override map
    pub async fn delete_group(&self, id: Uuid) -> Result<()> {
        let _guard = self.locks.acquire(id).await;
        let existed = self.store.delete_group(id).await?;
        self.locks.forget(id);

        if !existed {
            return Err(Error::group_not_found(id));
        }
        info!("Deleted group {}", id);
        Ok(())
    }

    /// Stored overrides for a group; empty when none were set
    pub async fn get_overrides(&self, id: Uuid) -> Result<OverrideMap> {
        self.store.get_overrides(id).await
    }

    /// Replace the override map of an existing group
    pub async fn set_overrides(&self, id: Uuid, overrides: OverrideMap) -> Result<()> {
        if overrides.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::Validation("override member names must not be empty".to_string()));
        }

        let _guard = self.locks.acquire(id).await;
        self.fetch_locked(id).await?;
        self.store.put_overrides(id, &overrides).await?;

        info!("Set {} probability overrides for group {}", overrides.len(), id);
        Ok(())
    }

    /// Draw one winner from a group and record the group as used
    pub async fn draw(&self, id: Uuid, rng: &dyn RandomSource) -> Result<DrawOutcome> {
        let _guard = self.locks.acquire(id).await;
        let mut group = self.fetch_locked(id).await?;

        let overrides = self.store.get_overrides(id).await?;
        let weights = draw::resolve_weights(&group.members, &overrides);
        let winner = draw::draw(&weights, rng)?;

        group.last_used = Some(self.clock.now());
        self.store.put_group(&group).await?;

        debug!("Draw for group {} won by '{}'", id, winner);
        Ok(DrawOutcome {
            winner,
            members: group.members,
        })
    }

    /// Fetch while holding the group's lock, releasing the lock entry if absent
    async fn fetch_locked(&self, id: Uuid) -> Result<Group> {
        match self.store.get_group(id).await? {
            Some(group) => Ok(group),
            None => {
                self.locks.forget(id);
                Err(Error::group_not_found(id))
            }
        }
    }
}

fn validate_group_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("groupName must not be empty".to_string()));
    }
    Ok(())
}

fn validate_members(members: &[String]) -> Result<()> {
    if members.len() < MIN_MEMBERS {
        return Err(Error::Validation(format!(
            "at least {} members required, got {}",
            MIN_MEMBERS,
            members.len()
        )));
    }

    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if member.trim().is_empty() {
            return Err(Error::Validation("member names must not be empty".to_string()));
        }
        if !seen.insert(member.as_str()) {
            return Err(Error::Validation(format!("duplicate member '{}'", member)));
        }
    }
    Ok(())
}
