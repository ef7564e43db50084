//! Entity store trait.
//!
//! Defines the interface of the persistence collaborator.

use super::saveable::Saveable;
use crate::activity::ActivityId;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for entities of type `E`.
///
/// Decouples the saveable contract from the storage mechanism (database,
/// remote API, in-memory map).
///
/// # Implementation Notes
///
/// Implementations must provide at-most-once semantics per call. No retries
/// are performed on their behalf; a retrying caller must keep its calls
/// idempotent with respect to key assignment.
#[async_trait]
pub trait EntityStore<E: Saveable>: Send + Sync {
    /// Inserts a new entity and returns the primary key assigned to it.
    ///
    /// The returned key must not be [`UNASSIGNED_KEY`](super::UNASSIGNED_KEY).
    async fn insert(&self, entity: &E, activity_id: Option<ActivityId>) -> Result<i64>;

    /// Updates an existing entity.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Entity updated
    /// - `Err(_)`: Entity does not exist or the store rejected the write
    async fn update(&self, entity: &E, activity_id: Option<ActivityId>) -> Result<()>;

    /// Removes the entity with the given key.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Entity removed
    /// - `Err(_)`: Entity does not exist or the store rejected the delete
    async fn remove(&self, key: i64, activity_id: Option<ActivityId>) -> Result<()>;

    /// Finds an entity by its primary key.
    async fn find(&self, key: i64) -> Result<Option<E>>;
}
