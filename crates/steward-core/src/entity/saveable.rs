//! The `Saveable` capability and its save/delete operations.

use super::audit::AuditContext;
use super::store::EntityStore;
use crate::activity::ActivityId;
use crate::error::{Result, StewardError};
use async_trait::async_trait;

/// Primary key of an entity that has never been persisted.
pub const UNASSIGNED_KEY: i64 = 0;

/// State every saveable business entity exposes.
///
/// Implementors provide raw accessors only. Whether the entity is new, and how
/// it is saved or deleted, comes from [`SaveableExt`], which is implemented for
/// every `Saveable` and cannot be overridden.
pub trait Saveable: Send + Sync {
    /// Type descriptor used in audit and exception log entries (e.g. `"Order"`).
    const ENTITY_NAME: &'static str;

    fn primary_key(&self) -> i64;

    /// Assigns the key returned by the store after an insert.
    fn assign_primary_key(&mut self, key: i64);

    /// Activity the entity was last saved under, sentinel when untracked.
    fn activity_id(&self) -> ActivityId;

    fn set_activity_id(&mut self, activity_id: ActivityId);
}

/// Save/delete operations available on every [`Saveable`].
#[async_trait]
pub trait SaveableExt: Saveable + Sized {
    /// True iff the primary key is still [`UNASSIGNED_KEY`].
    fn is_new(&self) -> bool;

    /// Persists the entity and returns its primary key.
    ///
    /// New entities are inserted and take the key assigned by the store;
    /// existing ones are updated. In tracked mode the activity id is stamped on
    /// the entity before the write and rolled back if the write fails.
    ///
    /// # Errors
    ///
    /// - `InvalidActivity` if `audit` tracks an unpersisted activity. The store
    ///   is not called.
    /// - `Persistence` if the store rejects the write.
    async fn save(&mut self, store: &dyn EntityStore<Self>, audit: AuditContext<'_>) -> Result<i64>;

    /// Removes the entity from the store.
    ///
    /// # Errors
    ///
    /// - `InvalidActivity` if `audit` tracks an unpersisted activity.
    /// - `Persistence` if the entity was never saved or the store rejects the delete.
    async fn delete(&self, store: &dyn EntityStore<Self>, audit: AuditContext<'_>) -> Result<()>;
}

#[async_trait]
impl<E: Saveable> SaveableExt for E {
    fn is_new(&self) -> bool {
        self.primary_key() == UNASSIGNED_KEY
    }

    async fn save(&mut self, store: &dyn EntityStore<Self>, audit: AuditContext<'_>) -> Result<i64> {
        let activity_id = audit.activity_id()?;

        let previous_activity = self.activity_id();
        if let Some(activity_id) = activity_id {
            self.set_activity_id(activity_id);
        }

        let written = if self.is_new() {
            match store.insert(&*self, activity_id).await {
                Ok(UNASSIGNED_KEY) => Err(StewardError::persistence(
                    E::ENTITY_NAME,
                    "store returned an unassigned primary key",
                )),
                other => other,
            }
        } else {
            let key = self.primary_key();
            store.update(&*self, activity_id).await.map(|()| key)
        };

        match written {
            Ok(key) => {
                self.assign_primary_key(key);
                Ok(key)
            }
            Err(err) => {
                self.set_activity_id(previous_activity);
                Err(as_persistence_error::<E>(err))
            }
        }
    }

    async fn delete(&self, store: &dyn EntityStore<Self>, audit: AuditContext<'_>) -> Result<()> {
        let activity_id = audit.activity_id()?;

        if self.is_new() {
            return Err(StewardError::persistence(
                E::ENTITY_NAME,
                "entity has never been saved",
            ));
        }

        store
            .remove(self.primary_key(), activity_id)
            .await
            .map_err(as_persistence_error::<E>)
    }
}

fn as_persistence_error<E: Saveable>(err: StewardError) -> StewardError {
    match err {
        StewardError::Persistence { .. } => err,
        other => StewardError::persistence(E::ENTITY_NAME, other.to_string()),
    }
}
