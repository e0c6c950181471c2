use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::*;

use dendra_core::{Dendrogram, NodeId};

use super::tree_title;
use crate::input::read_tree_file;

#[derive(Args)]
pub struct StatsArgs {
    /// Dendrogram (Newick file)
    pub tree: PathBuf,

    /// Render the dendrogram as an ASCII tree
    #[arg(long)]
    pub render: bool,

    /// Depth limit for the ASCII rendering
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

pub fn run(args: StatsArgs) -> Result<()> {
    let text = read_tree_file(&args.tree)?;
    let tree = Dendrogram::from_newick(tree_title(&args.tree), &text)?;

    let mut depths = vec![0usize; tree.len()];
    let mut max_depth = 0usize;
    for (id, node) in tree.nodes() {
        if let Some(parent) = node.parent {
            depths[id] = depths[parent] + 1;
            max_depth = max_depth.max(depths[id]);
        }
    }

    println!("{} {}", "Tree:".bold(), tree.title);
    println!("{} {}", "Leaves:".bold(), tree.leaf_count());
    println!("{} {}", "Nodes:".bold(), tree.len());
    println!("{} {}", "Depth:".bold(), max_depth);
    println!(
        "{} {:.4}",
        "Root distance:".bold(),
        tree.node(tree.root()).distance
    );
    println!("{} {:.4}", "Default cutoff:".bold(), tree.cutoff());

    if args.render {
        print!(
            "{}",
            format_tree(&tree, tree.root(), "", true, args.max_depth, 0)
        );
    }

    Ok(())
}

/// Format a node and its subtree as an ASCII tree.
fn format_tree(
    tree: &Dendrogram,
    node: NodeId,
    prefix: &str,
    is_last: bool,
    max_depth: Option<usize>,
    current_depth: usize,
) -> String {
    let mut result = String::new();

    // Add the branch characters
    if current_depth > 0 {
        result.push_str(prefix);
        if is_last {
            result.push_str("└── ");
        } else {
            result.push_str("├── ");
        }
    }

    // Add node information
    let n = tree.node(node);
    let display = n.name.as_deref().unwrap_or(&n.id);
    if current_depth == 0 {
        result.push_str(&format!("{} ({} leaves)\n", display, n.subtree_size));
    } else {
        result.push_str(&format!(
            "{} ({} leaves, :{})\n",
            display, n.subtree_size, n.distance_to_parent
        ));
    }

    // Check depth limit
    if let Some(max) = max_depth {
        if current_depth >= max {
            if !n.children.is_empty() {
                result.push_str(&format!(
                    "{}    ... ({} children)\n",
                    prefix,
                    n.children.len()
                ));
            }
            return result;
        }
    }

    // Add children
    let child_count = n.children.len();
    for (i, &child) in n.children.iter().enumerate() {
        let is_last_child = i == child_count - 1;
        let child_prefix = if current_depth == 0 {
            String::new()
        } else {
            format!("{}{}    ", prefix, if is_last { " " } else { "│" })
        };

        result.push_str(&format_tree(
            tree,
            child,
            &child_prefix,
            is_last_child,
            max_depth,
            current_depth + 1,
        ));
    }

    result
}
