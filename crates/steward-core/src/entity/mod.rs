//! Saveable entity capability.
//!
//! Any business entity that can be saved or deleted, either untracked or under
//! an auditable [`ActivityRecord`].
//!
//! # Module Structure
//!
//! - `audit`: `AuditContext`, the choice between untracked and tracked mode
//! - `store`: `EntityStore`, the persistence collaborator
//! - `saveable`: the `Saveable` trait and its `SaveableExt` operations
//!
//! # Usage
//!
//! ```ignore
//! use steward_core::entity::{AuditContext, Saveable, SaveableExt};
//!
//! let key = order.save(&store, AuditContext::Tracked(&activity)).await?;
//! ```
//!
//! [`ActivityRecord`]: crate::activity::ActivityRecord

mod audit;
mod saveable;
pub mod store;

// Re-export public API
pub use audit::AuditContext;
pub use saveable::{Saveable, SaveableExt, UNASSIGNED_KEY};
pub use store::EntityStore;
