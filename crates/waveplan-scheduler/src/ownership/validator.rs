//! Resource-ownership conflict detection over a wave-assigned batch.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use waveplan_core::TaskId;

use super::scope::ScopePolicy;
use crate::graph::TaskGraph;
use crate::waves::WaveAssignment;

/// The kind of ownership violation a [`Conflict`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Two tasks anywhere in the batch both create the same resource.
    DuplicateCreate,
    /// Two same-wave tasks modify the same resource and at least one claims
    /// the whole resource.
    UnscopedOverlap,
    /// Two same-wave tasks modify overlapping scopes of the same resource.
    ScopeOverlap,
}

/// One detected ownership violation between a pair of tasks.
///
/// Conflicts are reportable values, not errors: the pipeline still finishes,
/// and callers decide what to do with a plan that carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// What rule the pair violates.
    pub kind: ConflictKind,
    /// The contended resource path.
    pub path: String,
    /// First offending task, in batch order.
    pub first: TaskId,
    /// Second offending task.
    pub second: TaskId,
    /// Scope claimed by the first task, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_scope: Option<String>,
    /// Scope claimed by the second task, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_scope: Option<String>,
    /// Wave the pair shares, for modify conflicts. Create conflicts are
    /// global and carry no wave.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave: Option<usize>,
}

impl Display for Conflict {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            ConflictKind::DuplicateCreate => write!(
                formatter,
                "resource '{}' is created by both '{}' and '{}'",
                self.path, self.first, self.second
            ),
            ConflictKind::UnscopedOverlap | ConflictKind::ScopeOverlap => {
                let wave = self.wave.unwrap_or(0);
                write!(
                    formatter,
                    "tasks '{}' and '{}' in wave {wave} both modify '{}' with overlapping claims: {} vs {}",
                    self.first,
                    self.second,
                    self.path,
                    scope_label(self.first_scope.as_deref()),
                    scope_label(self.second_scope.as_deref()),
                )
            }
        }
    }
}

fn scope_label(scope: Option<&str>) -> String {
    scope.map_or_else(|| "(unscoped)".to_owned(), |name| format!("::{name}"))
}

/// Detects ownership conflicts among tasks that create the same resource or
/// would modify overlapping resources concurrently.
#[derive(Debug, Clone, Default)]
pub struct OwnershipValidator {
    policy: ScopePolicy,
}

impl OwnershipValidator {
    /// Creates a validator with the given scope-containment policy.
    pub fn new(policy: ScopePolicy) -> Self {
        Self { policy }
    }

    /// Runs both ownership passes and returns every conflict found.
    ///
    /// Creation is checked globally: a resource path may be created by at
    /// most one task across all waves. Modification is checked per wave
    /// only, since tasks in different waves never run concurrently and later
    /// waves may legitimately touch what earlier waves produced. The result
    /// is exhaustive, never first-failure.
    pub fn validate(&self, graph: &TaskGraph, waves: &WaveAssignment) -> Vec<Conflict> {
        let mut conflicts = Self::check_creates(graph);
        conflicts.extend(self.check_modifies(graph, waves));
        conflicts
    }

    /// Global create-exclusivity pass. Every creator of a path beyond the
    /// first (in batch order) is paired against the first.
    fn check_creates(graph: &TaskGraph) -> Vec<Conflict> {
        let mut creators: BTreeMap<&str, Vec<&TaskId>> = BTreeMap::new();
        for task in graph.tasks() {
            for path in &task.creates {
                creators.entry(path).or_default().push(&task.id);
            }
        }

        let mut conflicts = Vec::new();
        for (path, ids) in creators {
            let Some((&first, rest)) = ids.split_first() else {
                continue;
            };
            for &later in rest {
                conflicts.push(Conflict {
                    kind: ConflictKind::DuplicateCreate,
                    path: path.to_owned(),
                    first: first.clone(),
                    second: later.clone(),
                    first_scope: None,
                    second_scope: None,
                    wave: None,
                });
            }
        }
        conflicts
    }

    /// Per-wave modify pass: pairwise overlap among claims on the same path
    /// within one wave.
    fn check_modifies(&self, graph: &TaskGraph, waves: &WaveAssignment) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        for (wave, members) in waves.waves().iter().enumerate() {
            let mut claims: BTreeMap<&str, Vec<(&TaskId, Option<&str>)>> = BTreeMap::new();
            for id in members {
                let Some(task) = graph.task(id) else {
                    continue;
                };
                for claim in &task.modifies {
                    claims
                        .entry(claim.path.as_str())
                        .or_default()
                        .push((&task.id, claim.scope.as_deref()));
                }
            }

            for (path, entries) in claims {
                for (index, &(first, first_scope)) in entries.iter().enumerate() {
                    for &(second, second_scope) in &entries[index + 1..] {
                        if first == second {
                            continue;
                        }
                        let Some(kind) = self.classify(first_scope, second_scope) else {
                            continue;
                        };
                        conflicts.push(Conflict {
                            kind,
                            path: path.to_owned(),
                            first: first.clone(),
                            second: second.clone(),
                            first_scope: first_scope.map(str::to_owned),
                            second_scope: second_scope.map(str::to_owned),
                            wave: Some(wave),
                        });
                    }
                }
            }
        }
        conflicts
    }

    /// Classifies a claim pair on one path, or `None` when the claims can
    /// safely coexist.
    fn classify(&self, first: Option<&str>, second: Option<&str>) -> Option<ConflictKind> {
        if first.is_none() || second.is_none() {
            return Some(ConflictKind::UnscopedOverlap);
        }
        self.policy
            .overlaps(first, second)
            .then_some(ConflictKind::ScopeOverlap)
    }
}
