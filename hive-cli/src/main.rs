//! Hive CLI - Command-line interface
//!
//! Commands:
//! - play: Computer players against each other
//! - analyze: Ask one player for its move in a known position

mod analyze;
mod config;
mod play;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive rules engine and computer players")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play games between two computer players
    Play(play::PlayArgs),
    /// Search a known position and print the chosen move
    Analyze(analyze::AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Analyze(args) => analyze::run(args),
    }
}
