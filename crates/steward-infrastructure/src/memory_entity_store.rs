//! In-memory EntityStore implementation.

use async_trait::async_trait;
use std::collections::BTreeMap;
use steward_core::activity::ActivityId;
use steward_core::entity::{EntityStore, Saveable};
use steward_core::error::{Result, StewardError};
use tokio::sync::Mutex;

/// Kind of write recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Insert,
    Update,
    Remove,
}

/// One tracked write, as recorded by [`InMemoryEntityStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailEntry {
    pub entity_type: &'static str,
    pub key: i64,
    pub action: AuditAction,
    pub activity_id: ActivityId,
}

struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_key: i64,
    audit_trail: Vec<AuditTrailEntry>,
}

/// Map-backed store for entities of type `E`.
///
/// Keys are assigned sequentially from 1. Writes made under an activity are
/// appended to an audit trail; untracked writes are not.
pub struct InMemoryEntityStore<E> {
    table: Mutex<Table<E>>,
}

impl<E: Saveable + Clone> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_key: 0,
                audit_trail: Vec::new(),
            }),
        }
    }

    /// Tracked writes recorded so far, oldest first.
    pub async fn audit_trail(&self) -> Vec<AuditTrailEntry> {
        self.table.lock().await.audit_trail.clone()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<E: Saveable + Clone> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn record<E: Saveable>(
    table: &mut Table<E>,
    key: i64,
    action: AuditAction,
    activity_id: Option<ActivityId>,
) {
    if let Some(activity_id) = activity_id {
        table.audit_trail.push(AuditTrailEntry {
            entity_type: E::ENTITY_NAME,
            key,
            action,
            activity_id,
        });
    }
}

#[async_trait]
impl<E: Saveable + Clone> EntityStore<E> for InMemoryEntityStore<E> {
    async fn insert(&self, entity: &E, activity_id: Option<ActivityId>) -> Result<i64> {
        let mut table = self.table.lock().await;
        table.next_key += 1;
        let key = table.next_key;

        let mut row = entity.clone();
        row.assign_primary_key(key);
        table.rows.insert(key, row);
        record::<E>(&mut table, key, AuditAction::Insert, activity_id);

        tracing::debug!("[EntityStore] Inserted {} {}", E::ENTITY_NAME, key);
        Ok(key)
    }

    async fn update(&self, entity: &E, activity_id: Option<ActivityId>) -> Result<()> {
        let key = entity.primary_key();
        let mut table = self.table.lock().await;
        match table.rows.get_mut(&key) {
            Some(row) => *row = entity.clone(),
            None => return Err(StewardError::not_found(E::ENTITY_NAME, key.to_string())),
        }
        record::<E>(&mut table, key, AuditAction::Update, activity_id);

        tracing::debug!("[EntityStore] Updated {} {}", E::ENTITY_NAME, key);
        Ok(())
    }

    async fn remove(&self, key: i64, activity_id: Option<ActivityId>) -> Result<()> {
        let mut table = self.table.lock().await;
        if table.rows.remove(&key).is_none() {
            return Err(StewardError::not_found(E::ENTITY_NAME, key.to_string()));
        }
        record::<E>(&mut table, key, AuditAction::Remove, activity_id);

        tracing::debug!("[EntityStore] Removed {} {}", E::ENTITY_NAME, key);
        Ok(())
    }

    async fn find(&self, key: i64) -> Result<Option<E>> {
        Ok(self.table.lock().await.rows.get(&key).cloned())
    }
}
