//! Subcommand implementations.

use std::fs;
use std::io::{Write as _, stderr, stdout};
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use tracing_subscriber::EnvFilter;
use waveplan_core::TaskBatch;
use waveplan_scheduler::{
    DryRunExecutor, Plan, SchedulePipeline, SchedulerConfig, TaskGraph, audit_boundaries, drive,
};

use crate::cli::{Cli, Command};
use crate::report::{render_conflicts, render_violations};

/// Dispatches the parsed command line.
///
/// # Errors
/// Returns an error for unreadable input, structural batch errors, or
/// outstanding conflicts, so the process exits non-zero whenever the plan
/// is not safe to act on.
pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Plan {
            batch,
            output,
            dry_run,
        } => handle_plan(&config, &batch, output.as_deref(), dry_run),
        Command::Validate { batch } => handle_validate(&config, &batch),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SchedulerConfig> {
    match path {
        Some(explicit) => SchedulerConfig::load_from_file(explicit)
            .with_context(|| format!("failed to load config from {}", explicit.display())),
        None => SchedulerConfig::load_or_create().context("failed to load default config"),
    }
}

fn load_and_schedule(config: &SchedulerConfig, batch_path: &Path) -> Result<(TaskBatch, Plan)> {
    let batch = TaskBatch::from_json_file(batch_path)
        .with_context(|| format!("failed to load task batch from {}", batch_path.display()))?;
    tracing::debug!(tasks = batch.len(), "task batch loaded");

    let plan = SchedulePipeline::with_config(config.clone()).run(&batch)?;
    Ok((batch, plan))
}

fn handle_plan(
    config: &SchedulerConfig,
    batch_path: &Path,
    output: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let (batch, plan) = load_and_schedule(config, batch_path)?;

    for violation in audit_boundaries(&batch) {
        tracing::warn!(%violation, "boundary audit");
    }

    let artifact = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
    match output {
        Some(path) => {
            fs::write(path, format!("{artifact}\n"))
                .with_context(|| format!("failed to write plan to {}", path.display()))?;
            tracing::info!(path = %path.display(), "plan written");
        }
        None => writeln!(stdout().lock(), "{artifact}")?,
    }

    if !plan.is_executable() {
        writeln!(stderr().lock(), "{}", render_conflicts(&plan.conflicts))?;
        bail!("plan is not executable: {} conflicts", plan.conflicts.len());
    }

    if dry_run {
        let graph = TaskGraph::build(&batch)?;
        drive(&graph, &plan, &mut DryRunExecutor)?;
    }
    Ok(())
}

fn handle_validate(config: &SchedulerConfig, batch_path: &Path) -> Result<()> {
    let (batch, plan) = load_and_schedule(config, batch_path)?;

    let violations = audit_boundaries(&batch);
    if !violations.is_empty() {
        writeln!(stderr().lock(), "{}", render_violations(&violations))?;
        if config.enforce_boundary {
            bail!("batch has {} boundary violations", violations.len());
        }
    }

    if !plan.is_executable() {
        writeln!(stderr().lock(), "{}", render_conflicts(&plan.conflicts))?;
        bail!("batch has {} ownership conflicts", plan.conflicts.len());
    }

    writeln!(
        stdout().lock(),
        "ok: {} tasks across {} waves, critical path cost {}",
        plan.task_count(),
        plan.wave_count(),
        plan.total_cost
    )?;
    Ok(())
}
