//! Explicit context an operation runs with.

use crate::activity::{ActivityId, ActivityRecord};
use crate::exception_log::ExceptionLogRepository;
use crate::session::SessionIdentity;
use std::fmt;
use std::sync::Arc;

/// Everything an operation lifecycle needs from its surroundings.
///
/// Passed into the lifecycle at construction instead of being looked up from
/// a process-wide application object.
#[derive(Clone)]
pub struct OperationContext {
    /// Who triggered the operation.
    pub session: SessionIdentity,
    /// Activity the operation runs under, if tracked.
    pub activity: Option<ActivityRecord>,
    /// Type descriptor recorded on exception log entries (e.g. `"Order"`).
    pub source_type: String,
    /// Caller context recorded as the custom message of captured failures.
    pub failure_message: String,
    /// Where captured failures are persisted.
    pub exception_log: Arc<dyn ExceptionLogRepository>,
}

const DEFAULT_FAILURE_MESSAGE: &str = "Operation failed";

impl OperationContext {
    pub fn new(
        session: SessionIdentity,
        source_type: impl Into<String>,
        exception_log: Arc<dyn ExceptionLogRepository>,
    ) -> Self {
        Self {
            session,
            activity: None,
            source_type: source_type.into(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            exception_log,
        }
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Runs the operation under `activity`.
    pub fn with_activity(mut self, activity: ActivityRecord) -> Self {
        self.activity = Some(activity);
        self
    }

    /// Id stamped on captured failures; sentinel when untracked.
    pub fn activity_id(&self) -> ActivityId {
        self.activity
            .as_ref()
            .map(|activity| activity.activity_id)
            .unwrap_or(ActivityId::UNASSIGNED)
    }
}

impl fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("session", &self.session)
            .field("activity", &self.activity)
            .field("source_type", &self.source_type)
            .field("failure_message", &self.failure_message)
            .finish_non_exhaustive()
    }
}
