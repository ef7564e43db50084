//! Application layer for steward.
//!
//! Use cases that coordinate the domain types in `steward-core` with the
//! lifecycle in `steward-execution` and the collaborators in
//! `steward-infrastructure`.

pub mod activity_tracker;
pub mod bootstrap;
pub mod operation_runner;

pub use activity_tracker::ActivityTracker;
pub use bootstrap::{AppServices, open_exception_log};
pub use operation_runner::OperationRunner;
