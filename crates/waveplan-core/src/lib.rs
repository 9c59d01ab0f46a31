//! Core types for the waveplan scheduler.
//!
//! This crate provides the task model, batch construction and validation,
//! and error definitions shared across the waveplan workspace.

/// Error types and result definitions.
pub mod error;
/// Task model, resource claims, and batch validation.
pub mod types;

pub use error::{Error, Result};
pub use types::{ResourceClaim, Task, TaskBatch, TaskId};
