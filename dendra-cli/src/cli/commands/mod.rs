pub mod compare;
pub mod layout;
pub mod stats;

use std::path::Path;

use dendra_core::{Dendrogram, LabelConfig};

use crate::input::read_tree_file;

/// Display title for a tree file: its stem, or the full path if there is
/// none.
pub(crate) fn tree_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read, parse, and fully derive a dendrogram: labels synthesized under
/// the given policy and children sorted for stable display order.
pub(crate) fn build_tree(
    path: &Path,
    cutoff: Option<f64>,
    trim: bool,
    separator: &str,
    labels: &LabelConfig,
) -> anyhow::Result<Dendrogram> {
    let text = read_tree_file(path)?;
    let mut tree = Dendrogram::from_newick(tree_title(path), &text)?;
    if let Some(cutoff) = cutoff {
        tree.set_cutoff(cutoff);
    }
    tree.set_leaf_labels(trim, separator);
    tree.set_labels(labels.keep_structure, labels.keep_duplicates, separator);
    tree.sort();
    Ok(tree)
}
