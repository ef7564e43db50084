//! ExceptionLogEntry domain model.

use crate::activity::ActivityId;
use crate::entity::Saveable;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::backtrace::BacktraceStatus;
use std::fmt;
use std::sync::Arc;

/// Identifier of a persisted exception log entry. `0` until persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(i64);

impl LogId {
    pub const UNASSIGNED: LogId = LogId(0);

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

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the derived fields.
///
/// A freshly captured entry holds the live failure and renders its text on
/// demand; an entry reloaded from storage holds the text it was saved with.
#[derive(Debug, Clone)]
enum Failure {
    Live {
        error: Arc<anyhow::Error>,
        stack_trace: Arc<OnceCell<String>>,
    },
    Materialized {
        message: String,
        inner_message: String,
        stack_trace: String,
    },
}

/// A captured failure plus the context the caller supplied when capturing it.
///
/// `message`, `inner_message` and `stack_trace` are read-only views over the
/// captured failure; there are no setters for them. `log_id` and
/// `created_date` are assigned only by the persistence collaborator through
/// [`ExceptionLogEntry::mark_persisted`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "ExceptionLogRecord", from = "ExceptionLogRecord")]
pub struct ExceptionLogEntry {
    log_id: LogId,
    activity_id: ActivityId,
    source_type: String,
    custom_message: String,
    created_date: Option<DateTime<Utc>>,
    failure: Failure,
}

impl ExceptionLogEntry {
    /// Captures a failure raised while working on `source_type`.
    ///
    /// The stored custom message has the fixed form
    /// `"Error in type: {source_type}. Message: {custom_message}"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use steward_core::exception_log::ExceptionLogEntry;
    ///
    /// let entry = ExceptionLogEntry::capture(anyhow::anyhow!("overflow"), "Order", "bad total");
    /// assert_eq!(entry.custom_message(), "Error in type: Order. Message: bad total");
    /// assert_eq!(entry.message(), "overflow");
    /// assert_eq!(entry.inner_message(), "");
    /// ```
    pub fn capture(
        failure: impl Into<anyhow::Error>,
        source_type: impl Into<String>,
        custom_message: &str,
    ) -> Self {
        let source_type = source_type.into();
        Self {
            log_id: LogId::UNASSIGNED,
            activity_id: ActivityId::UNASSIGNED,
            custom_message: format_custom_message(&source_type, custom_message),
            source_type,
            created_date: None,
            failure: Failure::Live {
                error: Arc::new(failure.into()),
                stack_trace: Arc::new(OnceCell::new()),
            },
        }
    }

    /// Captures a failure raised while working on an entity of type `E`.
    pub fn capture_for<E: Saveable>(failure: impl Into<anyhow::Error>, custom_message: &str) -> Self {
        Self::capture(failure, E::ENTITY_NAME, custom_message)
    }

    /// Correlates this entry with an activity.
    pub fn with_activity(mut self, activity_id: ActivityId) -> Self {
        self.activity_id = activity_id;
        self
    }

    /// Records the id and timestamp assigned by the persistence collaborator.
    pub fn mark_persisted(&mut self, log_id: LogId, created_date: DateTime<Utc>) {
        self.log_id = log_id;
        self.created_date = Some(created_date);
    }

    pub fn log_id(&self) -> LogId {
        self.log_id
    }

    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn custom_message(&self) -> &str {
        &self.custom_message
    }

    /// `None` until the entry has been persisted.
    pub fn created_date(&self) -> Option<DateTime<Utc>> {
        self.created_date
    }

    /// Top-level message of the captured failure.
    pub fn message(&self) -> String {
        match &self.failure {
            Failure::Live { error, .. } => error.to_string(),
            Failure::Materialized { message, .. } => message.clone(),
        }
    }

    /// Message of the failure's direct cause, or `""` when it has none.
    pub fn inner_message(&self) -> String {
        match &self.failure {
            Failure::Live { error, .. } => error
                .chain()
                .nth(1)
                .map(|cause| cause.to_string())
                .unwrap_or_default(),
            Failure::Materialized { inner_message, .. } => inner_message.clone(),
        }
    }

    /// Rendered backtrace, or `""` when none was captured.
    pub fn stack_trace(&self) -> &str {
        match &self.failure {
            Failure::Live { error, stack_trace } => stack_trace.get_or_init(|| {
                let backtrace = error.backtrace();
                match backtrace.status() {
                    BacktraceStatus::Captured => backtrace.to_string(),
                    _ => String::new(),
                }
            }),
            Failure::Materialized { stack_trace, .. } => stack_trace,
        }
    }
}

fn format_custom_message(source_type: &str, custom_message: &str) -> String {
    format!("Error in type: {}. Message: {}", source_type, custom_message)
}

/// Flat storage form of an entry, with the derived fields materialised.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionLogRecord {
    #[serde(default)]
    log_id: LogId,
    #[serde(default)]
    activity_id: ActivityId,
    #[serde(default)]
    source_type: String,
    message: String,
    #[serde(default)]
    inner_message: String,
    #[serde(default)]
    stack_trace: String,
    custom_message: String,
    #[serde(default)]
    created_date: Option<DateTime<Utc>>,
}

impl From<ExceptionLogEntry> for ExceptionLogRecord {
    fn from(entry: ExceptionLogEntry) -> Self {
        Self {
            message: entry.message(),
            inner_message: entry.inner_message(),
            stack_trace: entry.stack_trace().to_string(),
            log_id: entry.log_id,
            activity_id: entry.activity_id,
            source_type: entry.source_type,
            custom_message: entry.custom_message,
            created_date: entry.created_date,
        }
    }
}

impl From<ExceptionLogRecord> for ExceptionLogEntry {
    fn from(record: ExceptionLogRecord) -> Self {
        Self {
            log_id: record.log_id,
            activity_id: record.activity_id,
            source_type: record.source_type,
            custom_message: record.custom_message,
            created_date: record.created_date,
            failure: Failure::Materialized {
                message: record.message,
                inner_message: record.inner_message,
                stack_trace: record.stack_trace,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_custom_message_format() {
        let entry = ExceptionLogEntry::capture(anyhow::anyhow!("overflow"), "Order", "bad total");
        assert_eq!(
            entry.custom_message(),
            "Error in type: Order. Message: bad total"
        );
        assert_eq!(entry.source_type(), "Order");
    }

    #[test]
    fn test_new_entry_is_unassigned() {
        let entry = ExceptionLogEntry::capture(anyhow::anyhow!("boom"), "Order", "x");
        assert_eq!(entry.log_id(), LogId::UNASSIGNED);
        assert_eq!(entry.activity_id(), ActivityId::UNASSIGNED);
        assert!(entry.created_date().is_none());
    }

    #[test]
    fn test_inner_message_empty_without_cause() {
        let entry = ExceptionLogEntry::capture(anyhow::anyhow!("flat failure"), "Order", "x");
        assert_eq!(entry.message(), "flat failure");
        assert_eq!(entry.inner_message(), "");
    }

    #[test]
    fn test_inner_message_from_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk is read-only");
        let failure = Err::<(), _>(io)
            .context("writing order ledger")
            .unwrap_err();

        let entry = ExceptionLogEntry::capture(failure, "Order", "save failed");
        assert_eq!(entry.message(), "writing order ledger");
        assert_eq!(entry.inner_message(), "disk is read-only");
    }

    #[test]
    fn test_std_error_is_captured() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let entry = ExceptionLogEntry::capture(io, "Customer", "sync failed");
        assert_eq!(entry.message(), "socket closed");
        assert_eq!(entry.inner_message(), "");
    }

    #[test]
    fn test_stack_trace_never_panics() {
        let entry = ExceptionLogEntry::capture(anyhow::anyhow!("boom"), "Order", "x");
        // Depends on RUST_BACKTRACE; either way it is a string, possibly empty.
        let first = entry.stack_trace().to_string();
        assert_eq!(entry.stack_trace(), first);
    }

    #[test]
    fn test_mark_persisted_and_activity() {
        let now = Utc::now();
        let mut entry = ExceptionLogEntry::capture(anyhow::anyhow!("boom"), "Order", "x")
            .with_activity(ActivityId::new(7));
        entry.mark_persisted(LogId::new(3), now);

        assert_eq!(entry.activity_id(), ActivityId::new(7));
        assert_eq!(entry.log_id(), LogId::new(3));
        assert_eq!(entry.created_date(), Some(now));
    }

    #[test]
    fn test_reloaded_entry_keeps_materialized_text() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "constraint violated");
        let failure = anyhow::Error::new(io).context("inserting order");
        let entry = ExceptionLogEntry::capture(failure, "Order", "save failed")
            .with_activity(ActivityId::new(11));

        let json = serde_json::to_string(&entry).unwrap();
        let reloaded: ExceptionLogEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(reloaded.message(), "inserting order");
        assert_eq!(reloaded.inner_message(), "constraint violated");
        assert_eq!(reloaded.stack_trace(), entry.stack_trace());
        assert_eq!(reloaded.custom_message(), entry.custom_message());
        assert_eq!(reloaded.activity_id(), ActivityId::new(11));
    }
}
