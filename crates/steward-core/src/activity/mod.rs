//! Activity domain module.
//!
//! An activity is the audit unit for one tracked business operation. Entities
//! saved or deleted under it carry its id, and so do the exception log entries
//! produced while it runs.
//!
//! # Module Structure
//!
//! - `model`: `ActivityId` and `ActivityRecord`
//! - `repository`: `ActivityRepository` trait for persistence

mod model;
pub mod repository;

// Re-export public API
pub use model::{ActivityId, ActivityRecord};
pub use repository::ActivityRepository;
