//! End-to-end tests for the scheduling pipeline
#![cfg(test)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::float_cmp,
    clippy::min_ident_chars,
    reason = "Test code prioritizes clarity over efficiency"
)]

use waveplan_core::{ResourceClaim, Task, TaskBatch, TaskId};
use waveplan_scheduler::{
    ConflictKind, DryRunExecutor, Plan, SchedulePipeline, SchedulerError, TaskGraph, drive,
};

fn batch(tasks: Vec<Task>) -> TaskBatch {
    TaskBatch::new(tasks).expect("batch should validate")
}

fn plan(tasks: Vec<Task>) -> Plan {
    SchedulePipeline::default()
        .run(&batch(tasks))
        .expect("pipeline should succeed")
}

fn id(text: &str) -> TaskId {
    TaskId::from(text)
}

#[test]
fn cycle_error_names_all_participants() {
    let result = SchedulePipeline::default().run(&batch(vec![
        Task::new("task-a").with_dependencies(vec![id("task-c")]),
        Task::new("task-b").with_dependencies(vec![id("task-a")]),
        Task::new("task-c").with_dependencies(vec![id("task-b")]),
        Task::new("task-d"),
    ]));

    match result {
        Err(SchedulerError::Cycle(cycle)) => {
            let mut ids: Vec<&str> = cycle.iter().map(TaskId::as_str).collect();
            ids.sort_unstable();
            assert_eq!(ids, vec!["task-a", "task-b", "task-c"]);
        }
        other => panic!("expected cycle error, got {other:?}"),
    }
}

#[test]
fn acyclic_batch_schedules() {
    let result = SchedulePipeline::default().run(&batch(vec![
        Task::new("task-a"),
        Task::new("task-b").with_dependencies(vec![id("task-a")]),
    ]));
    assert!(result.is_ok());
}

#[test]
fn waving_is_minimal() {
    let scheduled = plan(vec![
        Task::new("task-a"),
        Task::new("task-b"),
        Task::new("task-c").with_dependencies(vec![id("task-a"), id("task-b")]),
        Task::new("task-d").with_dependencies(vec![id("task-c")]),
    ]);

    // Wave 0 iff no dependencies; otherwise 1 + max over dependencies.
    assert_eq!(scheduled.wave_of[&id("task-a")], 0);
    assert_eq!(scheduled.wave_of[&id("task-b")], 0);
    assert_eq!(scheduled.wave_of[&id("task-c")], 1);
    assert_eq!(scheduled.wave_of[&id("task-d")], 2);
}

#[test]
fn create_exclusivity_is_global_across_waves() {
    // A creates x.py in wave 0, B creates x.py in wave 1: still a conflict.
    let scheduled = plan(vec![
        Task::new("task-a").with_creates(vec!["x.py".to_owned()]),
        Task::new("task-b")
            .with_dependencies(vec![id("task-a")])
            .with_creates(vec!["x.py".to_owned()]),
    ]);

    assert_eq!(scheduled.wave_of[&id("task-a")], 0);
    assert_eq!(scheduled.wave_of[&id("task-b")], 1);
    assert_eq!(scheduled.conflicts.len(), 1);
    assert_eq!(scheduled.conflicts[0].kind, ConflictKind::DuplicateCreate);
    assert_eq!(scheduled.conflicts[0].path, "x.py");
}

#[test]
fn unscoped_overlap_in_wave_zero() {
    let scheduled = plan(vec![
        Task::new("task-a").with_modifies(vec![ResourceClaim::unscoped("settings.py")]),
        Task::new("task-b").with_modifies(vec![ResourceClaim::unscoped("settings.py")]),
    ]);

    assert_eq!(scheduled.conflicts.len(), 1);
    let conflict = &scheduled.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::UnscopedOverlap);
    assert_eq!(conflict.path, "settings.py");
    assert_eq!(conflict.first, id("task-a"));
    assert_eq!(conflict.second, id("task-b"));
}

#[test]
fn scope_overlap_is_deterministic() {
    let nested = plan(vec![
        Task::new("task-a")
            .with_modifies(vec![ResourceClaim::scoped("orders.py", "OrderService")]),
        Task::new("task-b").with_modifies(vec![ResourceClaim::scoped(
            "orders.py",
            "OrderService.validate",
        )]),
    ]);
    assert_eq!(nested.conflicts.len(), 1);
    assert_eq!(nested.conflicts[0].kind, ConflictKind::ScopeOverlap);

    let disjoint = plan(vec![
        Task::new("task-a")
            .with_modifies(vec![ResourceClaim::scoped("orders.py", "OrderService")]),
        Task::new("task-b")
            .with_modifies(vec![ResourceClaim::scoped("orders.py", "PaymentService")]),
    ]);
    assert!(disjoint.conflicts.is_empty());
}

#[test]
fn cross_wave_modifications_are_safe() {
    let scheduled = plan(vec![
        Task::new("task-a").with_modifies(vec![ResourceClaim::unscoped("models.py")]),
        Task::new("task-b")
            .with_dependencies(vec![id("task-a")])
            .with_modifies(vec![ResourceClaim::unscoped("models.py")]),
    ]);
    assert!(scheduled.conflicts.is_empty());
    assert!(scheduled.is_executable());
}

#[test]
fn critical_path_on_linear_chain() {
    let scheduled = plan(vec![
        Task::new("task-a").with_cost(2.0),
        Task::new("task-b")
            .with_cost(3.0)
            .with_dependencies(vec![id("task-a")]),
        Task::new("task-c")
            .with_cost(1.0)
            .with_dependencies(vec![id("task-b")]),
    ]);

    assert_eq!(
        scheduled.critical_path,
        vec![id("task-a"), id("task-b"), id("task-c")]
    );
    assert_eq!(scheduled.total_cost, 6.0);
}

#[test]
fn pipeline_is_idempotent_byte_for_byte() {
    let text = r#"{
        "tasks": [
            {"id": "task-3", "depends_on": ["task-1"], "cost": 1.5,
             "modifies": ["urls.py::api"], "executor": "backend"},
            {"id": "task-1", "cost": 2.0, "creates": ["models.py"]},
            {"id": "task-2", "depends_on": ["task-1"], "cost": 3.0,
             "modifies": ["models.py::Order"], "boundary": ["urls.py"]}
        ]
    }"#;

    let render = || {
        let loaded = TaskBatch::from_json(text).expect("batch should parse");
        let scheduled = SchedulePipeline::default()
            .run(&loaded)
            .expect("pipeline should succeed");
        serde_json::to_string_pretty(&scheduled).expect("plan should serialize")
    };

    assert_eq!(render(), render());
}

#[test]
fn conflicted_plan_cannot_be_driven() {
    let tasks = batch(vec![
        Task::new("task-a").with_creates(vec!["x.py".to_owned()]),
        Task::new("task-b").with_creates(vec!["x.py".to_owned()]),
    ]);
    let graph = TaskGraph::build(&tasks).expect("graph should build");
    let scheduled = SchedulePipeline::default()
        .run(&tasks)
        .expect("pipeline should succeed");

    let result = drive(&graph, &scheduled, &mut DryRunExecutor);
    assert!(matches!(
        result,
        Err(SchedulerError::UnresolvedConflicts(1))
    ));
}

#[test]
fn clean_plan_drives_to_completion() {
    let tasks = batch(vec![
        Task::new("task-a").with_executor("backend"),
        Task::new("task-b")
            .with_executor("frontend")
            .with_dependencies(vec![id("task-a")]),
    ]);
    let graph = TaskGraph::build(&tasks).expect("graph should build");
    let scheduled = SchedulePipeline::default()
        .run(&tasks)
        .expect("pipeline should succeed");

    assert!(drive(&graph, &scheduled, &mut DryRunExecutor).is_ok());
}
