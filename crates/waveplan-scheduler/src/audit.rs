//! Advisory audit of declared task boundaries.
//!
//! Boundary lists are informational: they document what a task promises not
//! to touch, and the conflict validator never reads them. This audit catches
//! the one self-contradiction a plan author can express, a task that both
//! claims a path in `modifies` and disclaims it in `boundary`.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use waveplan_core::{TaskBatch, TaskId};

/// A task that modifies a path it declared off-limits for itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryViolation {
    /// The self-contradicting task.
    pub task: TaskId,
    /// The path appearing in both `modifies` and `boundary`.
    pub path: String,
}

impl Display for BoundaryViolation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(
            formatter,
            "task '{}' modifies '{}' despite listing it in its boundary",
            self.task, self.path
        )
    }
}

/// Reports every task whose modification claims intersect its own boundary.
///
/// Scopes are ignored: a scoped claim on a boundary path is still a
/// violation, since the boundary disclaims the whole resource. Violations
/// are advisory and never make a plan non-executable.
pub fn audit_boundaries(batch: &TaskBatch) -> Vec<BoundaryViolation> {
    let mut violations = Vec::new();
    for task in batch.tasks() {
        let mut flagged: Vec<&str> = Vec::new();
        for claim in &task.modifies {
            if task.boundary.contains(&claim.path) && !flagged.contains(&claim.path.as_str()) {
                flagged.push(&claim.path);
                violations.push(BoundaryViolation {
                    task: task.id.clone(),
                    path: claim.path.clone(),
                });
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveplan_core::{ResourceClaim, Task};

    fn batch(tasks: Vec<Task>) -> TaskBatch {
        match TaskBatch::new(tasks) {
            Ok(validated) => validated,
            Err(error) => panic!("batch construction failed: {error}"),
        }
    }

    #[test]
    fn test_clean_batch_has_no_violations() {
        let tasks = batch(vec![
            Task::new("task-1")
                .with_modifies(vec![ResourceClaim::unscoped("models.py")])
                .with_boundary(vec!["views.py".to_owned()]),
        ]);
        assert!(audit_boundaries(&tasks).is_empty());
    }

    #[test]
    fn test_modify_inside_own_boundary_is_flagged() {
        let tasks = batch(vec![
            Task::new("task-1")
                .with_modifies(vec![ResourceClaim::unscoped("views.py")])
                .with_boundary(vec!["views.py".to_owned()]),
        ]);
        let violations = audit_boundaries(&tasks);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].task, TaskId::from("task-1"));
        assert_eq!(violations[0].path, "views.py");
    }

    #[test]
    fn test_scoped_claim_on_boundary_path_is_still_flagged() {
        let tasks = batch(vec![
            Task::new("task-1")
                .with_modifies(vec![ResourceClaim::scoped("views.py", "OrderView")])
                .with_boundary(vec!["views.py".to_owned()]),
        ]);
        assert_eq!(audit_boundaries(&tasks).len(), 1);
    }

    #[test]
    fn test_repeated_claims_reported_once_per_path() {
        let tasks = batch(vec![
            Task::new("task-1")
                .with_modifies(vec![
                    ResourceClaim::scoped("views.py", "OrderView"),
                    ResourceClaim::scoped("views.py", "PaymentView"),
                ])
                .with_boundary(vec!["views.py".to_owned()]),
        ]);
        assert_eq!(audit_boundaries(&tasks).len(), 1);
    }

    #[test]
    fn test_other_tasks_boundaries_are_not_enforced() {
        // Boundaries only constrain the declaring task.
        let tasks = batch(vec![
            Task::new("task-1").with_boundary(vec!["shared.py".to_owned()]),
            Task::new("task-2").with_modifies(vec![ResourceClaim::unscoped("shared.py")]),
        ]);
        assert!(audit_boundaries(&tasks).is_empty());
    }
}
