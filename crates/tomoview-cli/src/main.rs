mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tomoview", about = "Inspect and edit tomography dataset properties")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions, physical size, units and tilt angles
    Info(commands::info::InfoArgs),
    /// Set the physical length of one axis (recomputes its spacing)
    SetLength(commands::length::SetLengthArgs),
    /// Set or export the tilt angles of a tilt series
    Tilt(commands::tilt::TiltArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::SetLength(args) => commands::length::run(args),
        Commands::Tilt(args) => commands::tilt::run(args),
    }
}
