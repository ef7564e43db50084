//! Domain core of Steward.
//!
//! Session identity, activity records, exception log entries, the saveable
//! entity capability and the operation result types, together with the
//! collaborator traits that infrastructure implements.

pub mod activity;
pub mod config;
pub mod entity;
pub mod error;
pub mod exception_log;
pub mod operation;
pub mod session;

// Re-export common error type
pub use error::{Result, StewardError};
