//! Error types for Steward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Steward workspace.
///
/// Typed, structured variants with automatic conversion from the error types
/// that collaborators commonly raise.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StewardError {
    /// The store rejected a save or delete.
    #[error("Persistence error on {entity_type}: {message}")]
    Persistence {
        entity_type: String,
        message: String,
    },

    /// A tracked save/delete was invoked with an unpersisted activity.
    #[error("Invalid activity: {0}")]
    InvalidActivity(String),

    /// A failure raised inside a business operation.
    #[error("Captured error: {message}")]
    Captured { message: String },

    /// An operation lifecycle transition that is not allowed from the current state.
    #[error("Invalid lifecycle transition: cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// A worker result whose outcome flags contradict each other.
    #[error("Invalid worker result: {0}")]
    InvalidResult(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StewardError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Persistence error for the given entity type.
    pub fn persistence(entity_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            entity_type: entity_type.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidActivity error
    pub fn invalid_activity(message: impl Into<String>) -> Self {
        Self::InvalidActivity(message.into())
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(from: &'static str, action: &'static str) -> Self {
        Self::InvalidTransition { from, action }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Check if this is an InvalidActivity error
    pub fn is_invalid_activity(&self) -> bool {
        matches!(self, Self::InvalidActivity(_))
    }

    /// Check if this is an InvalidTransition error
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StewardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StewardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StewardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used at the business operation boundary.
impl From<anyhow::Error> for StewardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Captured {
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StewardError>`.
pub type Result<T> = std::result::Result<T, StewardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_display() {
        let err = StewardError::persistence("Order", "unique constraint violated");
        assert!(err.is_persistence());
        assert_eq!(
            err.to_string(),
            "Persistence error on Order: unique constraint violated"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = StewardError::invalid_transition("Idle", "stop processing");
        assert!(err.is_invalid_transition());
        assert_eq!(
            err.to_string(),
            "Invalid lifecycle transition: cannot stop processing while Idle"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StewardError = io.into();
        assert!(matches!(err, StewardError::Io { .. }));
    }

    #[test]
    fn test_from_anyhow_is_captured() {
        let err: StewardError = anyhow::anyhow!("boom").into();
        assert_eq!(
            err,
            StewardError::Captured {
                message: "boom".to_string()
            }
        );
    }
}
