//! Executor boundary: the seam between planning and running.
//!
//! The scheduler only produces plans; actually running a task belongs to an
//! injected collaborator. The trait here is that collaborator's contract,
//! and [`drive`] is the reference loop that honors it: all tasks of a wave
//! are handed over together, and the next wave starts only after the
//! previous call returns.

use waveplan_core::Task;

use crate::error::{Result, SchedulerError};
use crate::graph::TaskGraph;
use crate::plan::Plan;

/// A worker backend that runs one wave of tasks at a time.
pub trait WaveExecutor {
    /// Runs every task of one wave to completion before returning.
    ///
    /// # Errors
    /// Returns an error if the wave cannot be executed; [`drive`] stops at
    /// the first failing wave.
    fn execute_wave(&mut self, wave: usize, tasks: &[&Task]) -> Result<()>;
}

/// Executor that only logs what it would run. Used by tests and dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl WaveExecutor for DryRunExecutor {
    fn execute_wave(&mut self, wave: usize, tasks: &[&Task]) -> Result<()> {
        for task in tasks {
            tracing::info!(
                wave,
                task = %task.id,
                executor = %task.executor,
                cost = task.cost,
                "would execute"
            );
        }
        Ok(())
    }
}

/// Feeds a plan to an executor, wave by wave.
///
/// Refuses a plan with outstanding ownership conflicts: executing it could
/// corrupt shared resources, and resolving conflicts is the caller's job,
/// never the scheduler's.
///
/// # Errors
/// Returns [`SchedulerError::UnresolvedConflicts`] for a conflicted plan, or
/// the first error an `execute_wave` call reports.
pub fn drive(graph: &TaskGraph, plan: &Plan, executor: &mut dyn WaveExecutor) -> Result<()> {
    if !plan.is_executable() {
        return Err(SchedulerError::UnresolvedConflicts(plan.conflicts.len()));
    }

    for (wave, members) in plan.waves.iter().enumerate() {
        let tasks: Vec<&Task> = members.iter().filter_map(|id| graph.task(id)).collect();
        executor.execute_wave(wave, &tasks)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SchedulePipeline;
    use waveplan_core::{ResourceClaim, TaskBatch, TaskId};

    /// Records wave hand-offs for assertions.
    #[derive(Default)]
    struct RecordingExecutor {
        waves: Vec<(usize, Vec<TaskId>)>,
    }

    impl WaveExecutor for RecordingExecutor {
        fn execute_wave(&mut self, wave: usize, tasks: &[&Task]) -> Result<()> {
            let ids = tasks.iter().map(|task| task.id.clone()).collect();
            self.waves.push((wave, ids));
            Ok(())
        }
    }

    fn batch(tasks: Vec<Task>) -> TaskBatch {
        match TaskBatch::new(tasks) {
            Ok(validated) => validated,
            Err(error) => panic!("batch construction failed: {error}"),
        }
    }

    #[test]
    fn test_drive_hands_over_full_waves_in_order() {
        let tasks = batch(vec![
            Task::new("task-1"),
            Task::new("task-2"),
            Task::new("task-3").with_dependencies(vec![TaskId::from("task-1")]),
        ]);
        let graph = match TaskGraph::build(&tasks) {
            Ok(built) => built,
            Err(error) => panic!("graph build failed: {error}"),
        };
        let plan = match SchedulePipeline::default().run(&tasks) {
            Ok(result) => result,
            Err(error) => panic!("pipeline failed: {error}"),
        };

        let mut recorder = RecordingExecutor::default();
        if let Err(error) = drive(&graph, &plan, &mut recorder) {
            panic!("drive failed: {error}");
        }

        assert_eq!(recorder.waves.len(), 2);
        assert_eq!(recorder.waves[0].0, 0);
        assert_eq!(recorder.waves[0].1.len(), 2);
        assert_eq!(recorder.waves[1].1, vec![TaskId::from("task-3")]);
    }

    #[test]
    fn test_drive_refuses_conflicted_plan() {
        let tasks = batch(vec![
            Task::new("task-1").with_modifies(vec![ResourceClaim::unscoped("settings.py")]),
            Task::new("task-2").with_modifies(vec![ResourceClaim::unscoped("settings.py")]),
        ]);
        let graph = match TaskGraph::build(&tasks) {
            Ok(built) => built,
            Err(error) => panic!("graph build failed: {error}"),
        };
        let plan = match SchedulePipeline::default().run(&tasks) {
            Ok(result) => result,
            Err(error) => panic!("pipeline failed: {error}"),
        };

        let result = drive(&graph, &plan, &mut DryRunExecutor);
        assert!(matches!(
            result,
            Err(SchedulerError::UnresolvedConflicts(1))
        ));
    }
}
