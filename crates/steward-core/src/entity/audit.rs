//! Audit context for save/delete.

use crate::activity::{ActivityId, ActivityRecord};
use crate::error::{Result, StewardError};

/// Whether a save/delete is correlated with an activity.
///
/// Untracked mode keeps low-value writes cheap; tracked mode is required
/// wherever an audit must reconstruct who changed what under which activity.
#[derive(Debug, Clone, Copy, Default)]
pub enum AuditContext<'a> {
    #[default]
    Untracked,
    Tracked(&'a ActivityRecord),
}

impl<'a> AuditContext<'a> {
    /// Returns the activity id to stamp, or `None` in untracked mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidActivity` if a tracked context refers to an activity
    /// that has not been persisted yet.
    pub fn activity_id(&self) -> Result<Option<ActivityId>> {
        match self {
            Self::Untracked => Ok(None),
            Self::Tracked(activity) if activity.is_persisted() => Ok(Some(activity.activity_id)),
            Self::Tracked(activity) => Err(StewardError::invalid_activity(format!(
                "activity '{}' has not been persisted",
                activity.name
            ))),
        }
    }

    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionIdentity;

    #[test]
    fn test_untracked_has_no_activity() {
        assert_eq!(AuditContext::Untracked.activity_id().unwrap(), None);
        assert!(!AuditContext::default().is_tracked());
    }

    #[test]
    fn test_tracked_with_persisted_activity() {
        let mut activity = ActivityRecord::new("Post journal", SessionIdentity::anonymous());
        activity.activity_id = ActivityId::new(5);

        let audit = AuditContext::Tracked(&activity);
        assert!(audit.is_tracked());
        assert_eq!(audit.activity_id().unwrap(), Some(ActivityId::new(5)));
    }

    #[test]
    fn test_tracked_with_unpersisted_activity_is_rejected() {
        let activity = ActivityRecord::new("Post journal", SessionIdentity::anonymous());
        let err = AuditContext::Tracked(&activity).activity_id().unwrap_err();
        assert!(err.is_invalid_activity());
    }
}
