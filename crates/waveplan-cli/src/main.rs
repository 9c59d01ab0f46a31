//! Waveplan CLI - wave scheduling and ownership validation for task batches

use anyhow::Result;
use clap::Parser as _;

use cli::Cli;

mod cli;
mod handlers;
mod report;

fn main() -> Result<()> {
    let cli = Cli::parse();
    handlers::run(cli)
}
