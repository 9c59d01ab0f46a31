//! Wave scheduling and ownership validation for task batches.
//!
//! This crate turns a validated [`waveplan_core::TaskBatch`] into an
//! execution plan: a dependency-minimal wave partition, an exhaustive list
//! of resource-ownership conflicts, and the cost-weighted critical path.
//! The whole pipeline is a pure, deterministic batch computation; running
//! tasks is left to an injected [`WaveExecutor`].

/// Advisory boundary audit.
pub mod audit;
/// Scheduler configuration.
pub mod config;
/// Cost-weighted critical path analysis.
pub mod critical_path;
/// Error types and result definitions.
pub mod error;
/// Executor boundary trait and reference drive loop.
pub mod executor;
/// Validated dependency graph construction.
pub mod graph;
/// Ownership conflict detection.
pub mod ownership;
/// The emitted plan artifact.
pub mod plan;
/// Pipeline orchestration.
pub mod orchestrator;
/// Wave partitioning.
pub mod waves;

pub use audit::{BoundaryViolation, audit_boundaries};
pub use config::SchedulerConfig;
pub use critical_path::CriticalPath;
pub use error::{Result, SchedulerError};
pub use executor::{DryRunExecutor, WaveExecutor, drive};
pub use graph::TaskGraph;
pub use orchestrator::SchedulePipeline;
pub use ownership::{Conflict, ConflictKind, OwnershipValidator, ScopeNesting, ScopePolicy};
pub use plan::Plan;
pub use waves::WaveAssignment;
