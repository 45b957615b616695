//! mazeq CLI - tabular Q-learning for a maze-chase game
//!
//! This CLI provides a unified interface for:
//! - Training a policy and checkpointing it to disk
//! - Benchmarking a saved policy with greedy play
//! - Inspecting the contents of a saved policy

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mazeq")]
#[command(version, about = "Q-learning agent for a maze-chase game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a policy, resuming from a saved one if requested
    Train(Box<mazeq::cli::commands::train::TrainArgs>),

    /// Play a saved policy greedily and print per-episode statistics
    Benchmark(mazeq::cli::commands::benchmark::BenchmarkArgs),

    /// Show the contents of a saved policy
    Inspect(mazeq::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => mazeq::cli::commands::train::execute(*args),
        Commands::Benchmark(args) => mazeq::cli::commands::benchmark::execute(args),
        Commands::Inspect(args) => mazeq::cli::commands::inspect::execute(args),
    }
}
