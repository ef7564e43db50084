//! WorkerResult value type.

use crate::error::{Result, StewardError};
use serde::{Deserialize, Serialize};

/// Message used for an error result that arrived without one.
const UNSPECIFIED_ERROR: &str = "operation failed";

/// Terminal outcome of an operation. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Succeeded,
    Cancelled,
    Errored { message: String },
}

/// Completion value of one operation invocation.
///
/// Consumers branch on [`WorkerResult::outcome`], never on `return_id`: a void
/// operation succeeds with the sentinel return id `0`.
///
/// The flat form (`returnId`, `succeeded`, `cancelled`, `errorMessage`) is the
/// serialized representation. Flag combinations that contradict each other
/// are rejected when deserializing or building through
/// [`WorkerResult::from_flags`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WorkerResultFlags", try_from = "WorkerResultFlags")]
pub struct WorkerResult {
    return_id: i64,
    outcome: Outcome,
}

impl WorkerResult {
    pub const NO_RETURN_ID: i64 = 0;

    pub fn succeeded_with(return_id: i64) -> Self {
        Self {
            return_id,
            outcome: Outcome::Succeeded,
        }
    }

    /// Success of an operation that produces no id.
    pub fn success() -> Self {
        Self::succeeded_with(Self::NO_RETURN_ID)
    }

    pub fn cancelled_result() -> Self {
        Self {
            return_id: Self::NO_RETURN_ID,
            outcome: Outcome::Cancelled,
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            return_id: Self::NO_RETURN_ID,
            outcome: Outcome::Errored {
                message: message.into(),
            },
        }
    }

    /// Builds a result from independent flags.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResult` when `succeeded` and `cancelled` are both set,
    /// or when an error message accompanies either of them.
    pub fn from_flags(
        return_id: i64,
        succeeded: bool,
        cancelled: bool,
        error_message: &str,
    ) -> Result<Self> {
        let outcome = match (succeeded, cancelled, error_message.is_empty()) {
            (true, true, _) => {
                return Err(StewardError::InvalidResult(
                    "a result cannot be both succeeded and cancelled".to_string(),
                ));
            }
            (true, false, true) => Outcome::Succeeded,
            (false, true, true) => Outcome::Cancelled,
            (false, false, true) => Outcome::Errored {
                message: UNSPECIFIED_ERROR.to_string(),
            },
            (false, false, false) => Outcome::Errored {
                message: error_message.to_string(),
            },
            (_, _, false) => {
                return Err(StewardError::InvalidResult(format!(
                    "error message '{}' on a non-error result",
                    error_message
                )));
            }
        };
        Ok(Self { return_id, outcome })
    }

    pub fn return_id(&self) -> i64 {
        self.return_id
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded)
    }

    pub fn cancelled(&self) -> bool {
        matches!(self.outcome, Outcome::Cancelled)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Errored { .. })
    }

    /// The single user-visible message, present only on error.
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Errored { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkerResultFlags {
    #[serde(default)]
    return_id: i64,
    #[serde(default)]
    succeeded: bool,
    #[serde(default)]
    cancelled: bool,
    #[serde(default)]
    error_message: String,
}

impl From<WorkerResult> for WorkerResultFlags {
    fn from(result: WorkerResult) -> Self {
        let (succeeded, cancelled, error_message) = match result.outcome {
            Outcome::Succeeded => (true, false, String::new()),
            Outcome::Cancelled => (false, true, String::new()),
            Outcome::Errored { message } => (false, false, message),
        };
        Self {
            return_id: result.return_id,
            succeeded,
            cancelled,
            error_message,
        }
    }
}

impl TryFrom<WorkerResultFlags> for WorkerResult {
    type Error = StewardError;

    fn try_from(flags: WorkerResultFlags) -> Result<Self> {
        WorkerResult::from_flags(
            flags.return_id,
            flags.succeeded,
            flags.cancelled,
            &flags.error_message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_sentinel_return_id() {
        let result = WorkerResult::success();
        assert!(result.succeeded());
        assert!(!result.cancelled());
        assert_eq!(result.return_id(), WorkerResult::NO_RETURN_ID);
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn test_errored_carries_single_message() {
        let result = WorkerResult::errored("store unavailable");
        assert!(result.is_error());
        assert!(!result.succeeded());
        assert!(!result.cancelled());
        assert_eq!(result.error_message(), Some("store unavailable"));
    }

    #[test]
    fn test_from_flags_rejects_succeeded_and_cancelled() {
        let err = WorkerResult::from_flags(4, true, true, "").unwrap_err();
        assert!(matches!(err, StewardError::InvalidResult(_)));
    }

    #[test]
    fn test_from_flags_rejects_message_on_success() {
        assert!(WorkerResult::from_flags(4, true, false, "oops").is_err());
        assert!(WorkerResult::from_flags(0, false, true, "oops").is_err());
    }

    #[test]
    fn test_from_flags_accepts_each_outcome() {
        assert_eq!(
            WorkerResult::from_flags(4, true, false, "").unwrap(),
            WorkerResult::succeeded_with(4)
        );
        assert_eq!(
            WorkerResult::from_flags(0, false, true, "").unwrap(),
            WorkerResult::cancelled_result()
        );
        assert_eq!(
            WorkerResult::from_flags(0, false, false, "bad").unwrap(),
            WorkerResult::errored("bad")
        );
    }

    #[test]
    fn test_from_flags_fills_missing_error_message() {
        let result = WorkerResult::from_flags(0, false, false, "").unwrap();
        assert_eq!(result.error_message(), Some("operation failed"));
    }

    #[test]
    fn test_serialized_form_is_flat() {
        let json = serde_json::to_value(WorkerResult::succeeded_with(8)).unwrap();
        assert_eq!(json["returnId"], 8);
        assert_eq!(json["succeeded"], true);
        assert_eq!(json["cancelled"], false);
        assert_eq!(json["errorMessage"], "");
    }

    #[test]
    fn test_deserialize_rejects_contradictory_flags() {
        let parsed: std::result::Result<WorkerResult, _> =
            serde_json::from_str(r#"{"returnId":1,"succeeded":true,"cancelled":true}"#);
        assert!(parsed.is_err());
    }
}
