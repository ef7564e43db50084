//! Exception log repository trait.

use super::model::{ExceptionLogEntry, LogId};
use crate::activity::ActivityId;
use crate::error::Result;
use async_trait::async_trait;

/// The logging collaborator that persists captured failures.
///
/// # Implementation Notes
///
/// `save` is the only place where `log_id` and `created_date` are assigned.
/// Implementations should store the entry's materialised text, since the live
/// failure does not outlive the process.
#[async_trait]
pub trait ExceptionLogRepository: Send + Sync {
    /// Persists an entry and returns it with `log_id` and `created_date` set.
    async fn save(&self, entry: &ExceptionLogEntry) -> Result<ExceptionLogEntry>;

    /// Finds an entry by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ExceptionLogEntry))`: Entry found
    /// - `Ok(None)`: Entry not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, log_id: LogId) -> Result<Option<ExceptionLogEntry>>;

    /// Lists entries correlated with the given activity, oldest first.
    async fn list_by_activity(&self, activity_id: ActivityId) -> Result<Vec<ExceptionLogEntry>>;
}
