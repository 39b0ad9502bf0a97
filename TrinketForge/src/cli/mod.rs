//! TrinketForge CLI - Command-line interface for trinket synthesis

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "trinketforge", version)]
#[command(about = "TrinketForge: generate Darkest Dungeon trinkets with a local model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the TrinketForge CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
