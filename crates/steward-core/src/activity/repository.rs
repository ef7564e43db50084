//! Activity repository trait.
//!
//! Defines the interface of the audit collaborator that persists activities.

use super::model::{ActivityId, ActivityRecord};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for persisting activity records.
///
/// # Implementation Notes
///
/// Implementations must assign a fresh, non-sentinel id when saving a record
/// whose id is still unassigned, and return the persisted record.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Persists an activity and returns it with its assigned id.
    ///
    /// # Returns
    ///
    /// - `Ok(ActivityRecord)`: The persisted record (`is_persisted() == true`)
    /// - `Err(_)`: Error occurred during save
    async fn save(&self, activity: &ActivityRecord) -> Result<ActivityRecord>;

    /// Finds an activity by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ActivityRecord))`: Activity found
    /// - `Ok(None)`: Activity not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, activity_id: ActivityId) -> Result<Option<ActivityRecord>>;
}
