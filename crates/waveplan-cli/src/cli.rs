//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for the waveplan CLI.
#[derive(Debug, Parser)]
#[command(
    name = "waveplan",
    version,
    about = "Turn a task batch into a wave-partitioned, conflict-checked execution plan"
)]
pub struct Cli {
    /// Path to a scheduler config file [default: ~/.waveplan/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a plan for a batch and emit it as JSON
    Plan {
        /// Path to the task batch JSON file
        batch: PathBuf,

        /// Write the plan to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Log the waves an executor would run, without running anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a batch and report ownership conflicts without emitting a plan
    Validate {
        /// Path to the task batch JSON file
        batch: PathBuf,
    },
}
