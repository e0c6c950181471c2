pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dendra",
    version,
    about = "Compare hierarchical clustering dendrograms",
    long_about = "Dendra parses Newick-style dendrogram descriptions, derives cluster labels, \
                  finds sub-clusters that correspond across two trees, and computes the \
                  display coordinates a renderer needs to draw them side by side."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML configuration file with default options
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find matching sub-clusters between two dendrograms
    Compare(commands::compare::CompareArgs),

    /// Compute display coordinates for a dendrogram
    Layout(commands::layout::LayoutArgs),

    /// Show structural statistics for a dendrogram
    Stats(commands::stats::StatsArgs),
}
