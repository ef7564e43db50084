//! Activity domain model.

use crate::session::SessionIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted activity.
///
/// `ActivityId::UNASSIGNED` (`0`) is the sentinel for "not persisted yet" and
/// for "untracked" wherever an entity or log entry carries an activity id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(i64);

impl ActivityId {
    pub const UNASSIGNED: ActivityId = ActivityId(0);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tracked business operation.
///
/// Created by the caller before a tracked save/delete, persisted by an
/// [`ActivityRepository`](super::ActivityRepository), and then stamped onto
/// entities and exception log entries produced under it. The activity does not
/// own those log entries; they reference it by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Sentinel until persisted.
    #[serde(default)]
    pub activity_id: ActivityId,
    /// Name of the business activity (e.g. "Approve invoice").
    pub name: String,
    /// Who started the activity.
    #[serde(default)]
    pub session: SessionIdentity,
    pub started_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Creates a new, unpersisted activity started now.
    pub fn new(name: impl Into<String>, session: SessionIdentity) -> Self {
        Self {
            activity_id: ActivityId::UNASSIGNED,
            name: name.into(),
            session,
            started_at: Utc::now(),
        }
    }

    /// Returns true once the audit collaborator has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.activity_id.is_assigned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_activity_is_unpersisted() {
        let activity = ActivityRecord::new("Approve invoice", SessionIdentity::anonymous());
        assert_eq!(activity.activity_id, ActivityId::UNASSIGNED);
        assert!(!activity.is_persisted());
    }

    #[test]
    fn test_activity_id_serializes_transparently() {
        let mut activity = ActivityRecord::new("Close period", SessionIdentity::anonymous());
        activity.activity_id = ActivityId::new(42);

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["activityId"], 42);

        let restored: ActivityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(restored, activity);
        assert!(restored.is_persisted());
    }
}
