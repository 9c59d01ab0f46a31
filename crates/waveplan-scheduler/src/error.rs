use core::result::Result as StdResult;

use thiserror::Error;
use waveplan_core::{Error as CoreError, TaskId};

/// Result type for scheduler operations.
pub type Result<T> = StdResult<T, SchedulerError>;

/// Errors that abort the scheduling pipeline.
///
/// Ownership conflicts are deliberately not represented here: they are
/// reportable values carried inside the plan, not pipeline failures.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A batch-construction or serialization error from the core crate.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Two tasks in the batch share an id.
    #[error("Duplicate task id: {0}")]
    DuplicateId(TaskId),

    /// A task depends on an id with no matching task.
    #[error("Task '{task}' depends on unknown task '{missing}'")]
    UnknownDependency {
        /// The task declaring the dependency.
        task: TaskId,
        /// The id that matched no task in the batch.
        missing: TaskId,
    },

    /// The dependency relation is not acyclic. Carries the participating
    /// task ids in cycle order.
    #[error("Cyclic dependency detected: {}", cycle_display(.0))]
    Cycle(Vec<TaskId>),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A plan with outstanding ownership conflicts was handed to an executor.
    #[error("Plan has {0} unresolved ownership conflicts")]
    UnresolvedConflicts(usize),
}

fn cycle_display(cycle: &[TaskId]) -> String {
    let mut ids: Vec<&str> = cycle.iter().map(TaskId::as_str).collect();
    // Repeat the first id so the loop closes visibly in diagnostics.
    if let Some(first) = ids.first().copied() {
        ids.push(first);
    }
    ids.join(" -> ")
}
