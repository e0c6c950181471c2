use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;
mod input;

use crate::cli::{Cli, Commands};
use dendra_core::{load_config, Config, DendraError};

fn main() {
    // Initialize logging with DENDRA_LOG environment variable support
    let log_level = std::env::var("DENDRA_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<DendraError>() {
            Some(DendraError::Configuration(_)) => 2,
            Some(DendraError::Io(_)) => 3,
            Some(DendraError::Parse(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if cli.verbose > 0 {
        match &cli.config {
            Some(path) => eprintln!("Using configuration from {}", path.display()),
            None => eprintln!("Using default configuration"),
        }
    }

    match cli.command {
        Commands::Compare(args) => crate::cli::commands::compare::run(args, &config),
        Commands::Layout(args) => crate::cli::commands::layout::run(args, &config),
        Commands::Stats(args) => crate::cli::commands::stats::run(args),
    }
}
