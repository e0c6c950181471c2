use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dendra_core::{update_coordinates, Config, Viewport};

use super::build_tree;

#[derive(Args)]
pub struct LayoutArgs {
    /// Dendrogram (Newick file)
    pub tree: PathBuf,

    /// Pixel span of the depth axis
    #[arg(long)]
    pub width: Option<f64>,

    /// Pixel span of the leaf axis
    #[arg(long)]
    pub height: Option<f64>,

    /// Horizontal translation of the drawing region
    #[arg(long)]
    pub offset_x: Option<f64>,

    /// Vertical translation of the drawing region
    #[arg(long)]
    pub offset_y: Option<f64>,

    /// Pixels reserved for leaf labels on a mirrored tree
    #[arg(long)]
    pub label_reserve: Option<f64>,

    /// Mirror the tree along the depth axis
    #[arg(long)]
    pub flip: bool,

    /// Distance cutoff for label synthesis (default: half the root distance)
    #[arg(long, value_name = "DIST")]
    pub cutoff: Option<f64>,
}

#[derive(Serialize)]
struct LayoutReport {
    title: String,
    leaf_count: usize,
    flipped: bool,
    nodes: Vec<NodeReport>,
    edges: Vec<EdgeReport>,
}

#[derive(Serialize)]
struct NodeReport {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    leaves: usize,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct EdgeReport {
    id: String,
    source: String,
    target: String,
}

pub fn run(args: LayoutArgs, config: &Config) -> Result<()> {
    let mut tree = build_tree(
        &args.tree,
        args.cutoff,
        config.labels.trim,
        &config.labels.separator,
        &config.labels,
    )?;
    if args.flip {
        tree.toggle_flipped();
    }

    let viewport = Viewport {
        offset_x: args.offset_x.unwrap_or(config.layout.offset_x),
        offset_y: args.offset_y.unwrap_or(config.layout.offset_y),
        width: args.width.unwrap_or(config.layout.width),
        height: args.height.unwrap_or(config.layout.height),
        label_reserve: args.label_reserve.unwrap_or(config.layout.label_reserve),
    };
    update_coordinates(&mut tree, &viewport);

    let nodes = tree
        .nodes()
        .map(|(_, node)| NodeReport {
            id: node.id.clone(),
            name: node.name.clone(),
            label: node.label.clone(),
            leaves: node.subtree_size,
            x: node.x,
            y: node.y,
        })
        .collect();
    let edges = tree
        .nodes()
        .filter_map(|(_, node)| {
            let parent = &tree.node(node.parent?).id;
            Some(EdgeReport {
                id: format!("{}{}", parent, node.id),
                source: parent.clone(),
                target: node.id.clone(),
            })
        })
        .collect();

    let report = LayoutReport {
        title: tree.title.clone(),
        leaf_count: tree.leaf_count(),
        flipped: tree.is_flipped(),
        nodes,
        edges,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lays_out_a_tree_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "('A':0.5,('B':0.3,'C':0.3):0.2);").unwrap();

        let args = LayoutArgs {
            tree: file.path().to_path_buf(),
            width: Some(400.0),
            height: Some(300.0),
            offset_x: None,
            offset_y: None,
            label_reserve: None,
            flip: true,
            cutoff: None,
        };
        run(args, &Config::default()).unwrap();
    }
}
