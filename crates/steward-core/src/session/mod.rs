//! Session identity module.
//!
//! The identity value describing "who is asking" for an operation. It is
//! produced upstream by an authentication collaborator and read by every
//! operation for audit attribution.

mod identity;

pub use identity::SessionIdentity;
