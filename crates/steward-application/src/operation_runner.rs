//! Builds operation lifecycles from shared collaborators.

use std::sync::Arc;
use steward_core::activity::ActivityRecord;
use steward_core::exception_log::ExceptionLogRepository;
use steward_core::operation::OperationContext;
use steward_core::session::SessionIdentity;
use steward_execution::OkCancel;

/// Hands out one [`OkCancel`] per UI-triggered operation.
///
/// Every lifecycle it creates reports failures to the same exception log.
#[derive(Clone)]
pub struct OperationRunner {
    exception_log: Arc<dyn ExceptionLogRepository>,
}

impl OperationRunner {
    pub fn new(exception_log: Arc<dyn ExceptionLogRepository>) -> Self {
        Self { exception_log }
    }

    /// Creates an idle lifecycle for an operation on `source_type`.
    ///
    /// Failures captured by the lifecycle are correlated with `activity` when
    /// one is given.
    pub fn lifecycle(
        &self,
        session: SessionIdentity,
        activity: Option<ActivityRecord>,
        source_type: impl Into<String>,
    ) -> Arc<OkCancel> {
        let mut context = OperationContext::new(session, source_type, self.exception_log.clone());
        if let Some(activity) = activity {
            context = context.with_activity(activity);
        }
        tracing::debug!(
            "[OperationRunner] New lifecycle for {} (activity {})",
            context.source_type,
            context.activity_id()
        );
        Arc::new(OkCancel::new(context))
    }
}
