//! Human-readable rendering of conflicts and audit findings.
//!
//! The scheduler reports conflicts as structured values; this module is the
//! conflict-reporter collaborator that turns them into something a person
//! can act on. It never attempts resolution.

use waveplan_scheduler::{BoundaryViolation, Conflict};

/// Renders the full conflict list with a closing remediation hint.
pub fn render_conflicts(conflicts: &[Conflict]) -> String {
    let mut lines = vec![format!(
        "File ownership conflicts detected ({}):",
        conflicts.len()
    )];
    for conflict in conflicts {
        lines.push(format!("  - {conflict}"));
    }
    lines.push(
        "Review the task definitions: each resource may be created by at most one task, \
         and same-wave modifications must use non-overlapping scopes."
            .to_owned(),
    );
    lines.join("\n")
}

/// Renders boundary-audit findings.
pub fn render_violations(violations: &[BoundaryViolation]) -> String {
    let mut lines = vec![format!(
        "Boundary violations detected ({}):",
        violations.len()
    )];
    for violation in violations {
        lines.push(format!("  - {violation}"));
    }
    lines.join("\n")
}
