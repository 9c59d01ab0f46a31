//! Wave partitioning: longest-path leveling over the validated DAG.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waveplan_core::TaskId;

use crate::graph::TaskGraph;

/// Assignment of every task to a 0-indexed wave.
///
/// Tasks sharing a wave number have no dependency relationship among
/// themselves and may run concurrently. The assignment is the unique minimal
/// leveling: every task lands in the earliest wave consistent with its
/// dependencies, which maximizes the parallelism available per wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveAssignment {
    wave_of: BTreeMap<TaskId, usize>,
    waves: Vec<Vec<TaskId>>,
}

impl WaveAssignment {
    /// Computes the wave for every task in the graph.
    ///
    /// `wave(task)` is 0 for dependency-free tasks, otherwise
    /// `1 + max(wave(dep))`. Declared cost never influences placement;
    /// wave assignment is dependency-driven only.
    pub fn partition(graph: &TaskGraph) -> Self {
        let mut wave_of: BTreeMap<TaskId, usize> = BTreeMap::new();
        let mut waves: Vec<Vec<TaskId>> = Vec::new();

        for task in graph.topo_order() {
            let wave = graph
                .dependencies(&task.id)
                .iter()
                .map(|dep| wave_of.get(&dep.id).copied().unwrap_or(0))
                .max()
                .map_or(0, |deepest| deepest + 1);

            if wave == waves.len() {
                waves.push(Vec::new());
            }
            waves[wave].push(task.id.clone());
            wave_of.insert(task.id.clone(), wave);
        }

        Self { wave_of, waves }
    }

    /// The wave assigned to a task, if the task exists.
    pub fn wave(&self, id: &TaskId) -> Option<usize> {
        self.wave_of.get(id).copied()
    }

    /// The full task-id to wave-number mapping.
    pub fn wave_of(&self) -> &BTreeMap<TaskId, usize> {
        &self.wave_of
    }

    /// Tasks grouped by wave, in topological discovery order within a wave.
    pub fn waves(&self) -> &[Vec<TaskId>] {
        &self.waves
    }

    /// Number of waves in the schedule.
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Consumes the assignment, returning the wave map and per-wave groups.
    pub fn into_parts(self) -> (BTreeMap<TaskId, usize>, Vec<Vec<TaskId>>) {
        (self.wave_of, self.waves)
    }
}
