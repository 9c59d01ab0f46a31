//! Ownership conflict detection: scope policy and the two-pass validator.

mod scope;
mod validator;

pub use scope::{ScopeNesting, ScopePolicy};
pub use validator::{Conflict, ConflictKind, OwnershipValidator};
