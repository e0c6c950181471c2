use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use itertools::Itertools;
use serde::Serialize;
use tracing::info;

use dendra_core::{
    assign_colors, init_equal_branches, match_trees, ClusterMatch, Config, Dendrogram,
    HighlightMode,
};

use super::build_tree;

/// Fixed palette cycled over match labels. Real color policy belongs to
/// the renderer; this only keeps reports legible.
const PALETTE: &[&str] = &[
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6", "#bcf60c",
    "#008080", "#9a6324",
];

#[derive(Args)]
pub struct CompareArgs {
    /// First dendrogram (Newick file)
    pub tree1: PathBuf,

    /// Second dendrogram (Newick file)
    pub tree2: PathBuf,

    /// Minimum leaves for a sub-cluster to participate in matching
    #[arg(long, value_name = "N")]
    pub min_leaves: Option<usize>,

    /// Distance cutoff for label synthesis (default: half the root distance)
    #[arg(long, value_name = "DIST")]
    pub cutoff: Option<f64>,

    /// Separator joining leaf-derived tokens in synthesized labels
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Trim leaf names at the last separator before labeling
    #[arg(long)]
    pub trim: bool,

    /// Branch-comparison mode: none, simi, or diff
    #[arg(long, value_name = "MODE")]
    pub highlight: Option<HighlightMode>,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CompareReport<'a> {
    left: &'a str,
    right: &'a str,
    min_leaves: usize,
    highlight: HighlightMode,
    matches: Vec<MatchReport>,
}

#[derive(Serialize)]
struct MatchReport {
    label: String,
    color: Option<String>,
    source_id: String,
    target_id: String,
    source_leaves: usize,
    target_leaves: usize,
    equal_source: Vec<String>,
    equal_target: Vec<String>,
}

pub fn run(args: CompareArgs, config: &Config) -> Result<()> {
    let separator = args
        .separator
        .clone()
        .unwrap_or_else(|| config.labels.separator.clone());
    let trim = args.trim || config.labels.trim;
    let min_leaves = args.min_leaves.unwrap_or(config.matching.min_leaves).max(1);
    let highlight = args.highlight.unwrap_or(config.matching.highlight);

    let left = build_tree(&args.tree1, args.cutoff, trim, &separator, &config.labels)?;
    let right = build_tree(&args.tree2, args.cutoff, trim, &separator, &config.labels)?;
    info!(
        "comparing '{}' ({} leaves) with '{}' ({} leaves)",
        left.title,
        left.leaf_count(),
        right.title,
        right.leaf_count()
    );

    let mut matches = match_trees(&left, &right, min_leaves);
    for m in matches.iter_mut() {
        init_equal_branches(&left, &right, m, highlight);
    }

    // One color per distinct label, assigned after the full matching pass.
    let colors: HashMap<String, String> = matches
        .iter()
        .map(|m| m.label.clone())
        .unique()
        .enumerate()
        .map(|(index, label)| (label, PALETTE[index % PALETTE.len()].to_string()))
        .collect();
    assign_colors(&mut matches, &colors);

    if args.json {
        let report = CompareReport {
            left: &left.title,
            right: &right.title,
            min_leaves,
            highlight,
            matches: matches
                .iter()
                .map(|m| match_report(&left, &right, m))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&left, &right, &matches);
    }

    Ok(())
}

fn match_report(left: &Dendrogram, right: &Dendrogram, m: &ClusterMatch) -> MatchReport {
    let branches = m.equal_branches.clone().unwrap_or_default();
    MatchReport {
        label: m.label.clone(),
        color: m.color.clone(),
        source_id: left.node(m.source).id.clone(),
        target_id: right.node(m.target).id.clone(),
        source_leaves: left.node(m.source).subtree_size,
        target_leaves: right.node(m.target).subtree_size,
        equal_source: branches.source,
        equal_target: branches.target,
    }
}

fn print_table(left: &Dendrogram, right: &Dendrogram, matches: &[ClusterMatch]) {
    if matches.is_empty() {
        println!(
            "No matching clusters between '{}' and '{}'",
            left.title, right.title
        );
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Label", "Source", "Target", "Leaves", "Color", "Branches",
    ]);
    for m in matches {
        let branches = m
            .equal_branches
            .as_ref()
            .map(|b| format!("{} / {}", b.source.len(), b.target.len()))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            m.label.clone(),
            left.node(m.source).id.clone(),
            right.node(m.target).id.clone(),
            format!(
                "{} / {}",
                left.node(m.source).subtree_size,
                right.node(m.target).subtree_size
            ),
            m.color.clone().unwrap_or_default(),
            branches,
        ]);
    }
    println!("{table}");
    println!(
        "{} matching cluster(s) between '{}' and '{}'",
        matches.len(),
        left.title,
        right.title
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tree(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn compares_two_files_end_to_end() {
        let left = write_tree("'A':1.0,('B':0.3,'C':0.3):0.7;");
        let right = write_tree("('C':0.3,'B':0.3):0.7,'A':1.0;");

        let args = CompareArgs {
            tree1: left.path().to_path_buf(),
            tree2: right.path().to_path_buf(),
            min_leaves: Some(2),
            cutoff: None,
            separator: None,
            trim: false,
            highlight: Some(HighlightMode::Similarities),
            json: true,
        };
        run(args, &Config::default()).unwrap();
    }

    #[test]
    fn rejects_malformed_input() {
        let left = write_tree("('A':1.0,'B':2.0");
        let right = write_tree("'A':1.0,'B':2.0");

        let args = CompareArgs {
            tree1: left.path().to_path_buf(),
            tree2: right.path().to_path_buf(),
            min_leaves: None,
            cutoff: None,
            separator: None,
            trim: false,
            highlight: None,
            json: false,
        };
        assert!(run(args, &Config::default()).is_err());
    }
}
