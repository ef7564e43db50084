//! Exception log domain module.
//!
//! Captured failures wrapped with caller context, ready to be persisted by a
//! logging collaborator.
//!
//! # Module Structure
//!
//! - `model`: `LogId` and `ExceptionLogEntry`
//! - `repository`: `ExceptionLogRepository` trait for persistence
//!
//! # Usage
//!
//! ```ignore
//! use steward_core::exception_log::{ExceptionLogEntry, ExceptionLogRepository};
//! ```

mod model;
pub mod repository;

// Re-export public API
pub use model::{ExceptionLogEntry, LogId};
pub use repository::ExceptionLogRepository;
