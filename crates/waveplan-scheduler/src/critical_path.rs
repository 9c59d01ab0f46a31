//! Cost-weighted longest-path analysis over the validated DAG.

use std::cmp::Ordering;
use std::collections::HashMap;

use waveplan_core::TaskId;

use crate::graph::TaskGraph;

/// The maximum-cost chain of dependent tasks, from an origin task with no
/// dependencies to a sink task nothing depends on.
///
/// The total cost lower-bounds schedule duration: no executor, however
/// parallel, can finish earlier than the bottleneck chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    /// Task ids along the path, origin first.
    pub tasks: Vec<TaskId>,
    /// Sum of costs along the path.
    pub total_cost: f64,
}

impl CriticalPath {
    /// Computes the critical path.
    ///
    /// `longest_cost_to(task)` is the task's own cost plus the maximum over
    /// its dependencies, tracked with predecessor pointers for
    /// reconstruction. Ties are broken toward the lexicographically smallest
    /// task id at every choice point, so equal-cost batches always produce
    /// the same path.
    pub fn analyze(graph: &TaskGraph) -> Self {
        let mut longest: HashMap<&TaskId, f64> = HashMap::with_capacity(graph.task_count());
        let mut predecessor: HashMap<&TaskId, &TaskId> = HashMap::new();

        for task in graph.topo_order() {
            let mut best: Option<(&TaskId, f64)> = None;
            for dep in graph.dependencies(&task.id) {
                let dep_total = longest.get(&dep.id).copied().unwrap_or(0.0);
                if prefer(&dep.id, dep_total, best) {
                    best = Some((&dep.id, dep_total));
                }
            }

            let through = best.map_or(0.0, |(_, dep_total)| dep_total);
            longest.insert(&task.id, task.cost + through);
            if let Some((dep_id, _)) = best {
                predecessor.insert(&task.id, dep_id);
            }
        }

        let mut end: Option<(&TaskId, f64)> = None;
        for sink in graph.sinks() {
            let total = longest.get(&sink.id).copied().unwrap_or(0.0);
            if prefer(&sink.id, total, end) {
                end = Some((&sink.id, total));
            }
        }

        let Some((end_id, total_cost)) = end else {
            return Self {
                tasks: Vec::new(),
                total_cost: 0.0,
            };
        };

        let mut tasks = vec![end_id.clone()];
        let mut cursor = end_id;
        while let Some(&prev) = predecessor.get(cursor) {
            tasks.push(prev.clone());
            cursor = prev;
        }
        tasks.reverse();

        Self { tasks, total_cost }
    }
}

/// Whether a candidate beats the current best: strictly higher cost wins,
/// and on equal cost the smaller task id wins.
fn prefer(candidate: &TaskId, total: f64, current: Option<(&TaskId, f64)>) -> bool {
    current.is_none_or(
        |(current_id, current_total)| match total.partial_cmp(&current_total) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => candidate < current_id,
            _ => false,
        },
    )
}
