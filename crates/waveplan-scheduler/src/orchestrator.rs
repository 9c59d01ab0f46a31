//! Top-level pipeline coordinating all scheduling stages.

use waveplan_core::TaskBatch;

use crate::config::SchedulerConfig;
use crate::critical_path::CriticalPath;
use crate::error::Result;
use crate::graph::TaskGraph;
use crate::ownership::OwnershipValidator;
use crate::plan::Plan;
use crate::waves::WaveAssignment;

/// Runs the full scheduling pipeline on an immutable batch.
///
/// Stages run in fixed order: graph build (duplicate ids, unknown
/// dependencies, cycles), wave partitioning, ownership validation, critical
/// path analysis, plan assembly. Structural errors abort before wave
/// assignment; ownership conflicts never abort — they are collected
/// exhaustively so the caller sees every problem at once, not just the
/// first.
///
/// Each invocation is an independent, pure computation: re-running the
/// pipeline on the same batch yields an identical plan.
#[derive(Debug, Clone, Default)]
pub struct SchedulePipeline {
    config: SchedulerConfig,
}

impl SchedulePipeline {
    /// Creates a pipeline with the given configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validates the batch and produces an execution plan.
    ///
    /// # Errors
    /// Returns [`crate::SchedulerError::DuplicateId`],
    /// [`crate::SchedulerError::UnknownDependency`], or
    /// [`crate::SchedulerError::Cycle`] for a structurally invalid batch.
    /// Ownership conflicts are not errors; they are returned inside the
    /// plan, which is then flagged non-executable.
    pub fn run(&self, batch: &TaskBatch) -> Result<Plan> {
        let graph = TaskGraph::build(batch)?;
        tracing::debug!(tasks = graph.task_count(), "dependency graph validated");
        Ok(self.run_graph(&graph))
    }

    /// Runs the post-validation stages on an already-built graph.
    pub fn run_graph(&self, graph: &TaskGraph) -> Plan {
        let waves = WaveAssignment::partition(graph);

        let validator = OwnershipValidator::new(self.config.scope.clone());
        let conflicts = validator.validate(graph, &waves);

        let critical = CriticalPath::analyze(graph);

        tracing::info!(
            tasks = graph.task_count(),
            waves = waves.wave_count(),
            conflicts = conflicts.len(),
            total_cost = critical.total_cost,
            "plan computed"
        );

        let (wave_of, wave_groups) = waves.into_parts();
        Plan {
            wave_of,
            waves: wave_groups,
            conflicts,
            critical_path: critical.tasks,
            total_cost: critical.total_cost,
        }
    }
}
