//! Operation execution for steward.
//!
//! Hosts the [`OkCancel`] lifecycle that drives a single business operation
//! to exactly one terminal state, and a tracing layer that forwards its
//! events to observers.

pub mod lifecycle;
pub mod tracing_layer;

pub use lifecycle::{LifecycleSnapshot, OkCancel};
pub use tracing_layer::{OperationEvent, OperationEventLayer};
