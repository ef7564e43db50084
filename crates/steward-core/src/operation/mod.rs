//! Operation lifecycle domain module.
//!
//! # Module Structure
//!
//! - `result`: `WorkerResult`, the terminal value of an operation
//! - `state`: `LifecycleState`, the `OkCancel` state machine states
//! - `context`: `OperationContext`, the explicit collaborators an operation runs with

mod context;
mod result;
mod state;

// Re-export public API
pub use context::OperationContext;
pub use result::{Outcome, WorkerResult};
pub use state::LifecycleState;
