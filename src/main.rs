//! Lighthouses CLI - Command-line interface for running and watching matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Lighthouses - A territory-control game for external bots
#[derive(Parser, Debug)]
#[command(name = "lighthouses")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a match between bots
    Run {
        /// Map file
        map: PathBuf,

        /// Bot command lines, one per player, run through `sh -c`
        #[arg(required = true)]
        bots: Vec<String>,

        #[command(flatten)]
        match_args: cli::MatchArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// Suppress round-by-round output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a match in real-time
    Watch {
        /// Map file
        map: PathBuf,

        /// Bot command lines, one per player, run through `sh -c`
        #[arg(required = true)]
        bots: Vec<String>,

        #[command(flatten)]
        match_args: cli::MatchArgs,

        /// Round delay in milliseconds (default: 500)
        #[arg(long, default_value = "500")]
        speed: u64,
    },

    /// Check a map file and print a summary
    Validate {
        /// Map file to validate
        map: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::Run {
            map,
            bots,
            match_args,
            format,
            progress,
            quiet,
        } => cli::run::execute(&map, &bots, match_args.config(), format, progress, quiet),

        Commands::Watch {
            map,
            bots,
            match_args,
            speed,
        } => cli::watch::execute(&map, &bots, match_args.config(), speed),

        Commands::Validate { map } => cli::validate::execute(&map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
