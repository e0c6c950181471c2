//! Cross-tree cluster matching
//!
//! Finds pairs of sub-clusters whose synthesized labels agree between two
//! dendrograms, and compares the branches inside a matched pair.

pub mod branches;

use std::collections::HashMap;

use tracing::info;

use crate::model::{Dendrogram, NodeId};

pub use branches::{equal_branches, init_equal_branches, EqualBranches, HighlightMode};

/// A pairing of one sub-cluster root in each of two trees believed to
/// represent the same grouping.
///
/// Holds arena indices into the source and target trees it was computed
/// from; the trees themselves are not owned.
#[derive(Debug, Clone)]
pub struct ClusterMatch {
    /// Matched node in the source tree.
    pub source: NodeId,
    /// Matched node in the target tree.
    pub target: NodeId,
    /// Label shared by the pair, copied from the source node at match time.
    pub label: String,
    /// Display color, assigned by the caller once all matches of a scene
    /// are known; never chosen here.
    pub color: Option<String>,
    /// Edge-id lists of structurally corresponding branches, filled on
    /// demand by the branch comparator.
    pub equal_branches: Option<EqualBranches>,
}

/// Find label-equal sub-cluster pairings between `source` (starting at
/// `node`) and `target`.
///
/// A node whose subtree holds fewer than `min_leaves` leaves is trivial:
/// it is excluded from matching and never descended into. For an eligible
/// labeled node, the target tree is searched in preorder and the first
/// label-equal candidate of sufficient size wins, so the coarsest match is
/// reported and nested finer matches below it are not. Without a hit the
/// search recurses into the node's children and concatenates their results.
pub fn find_matching_clusters(
    source: &Dendrogram,
    node: NodeId,
    target: &Dendrogram,
    min_leaves: usize,
) -> Vec<ClusterMatch> {
    if source.node(node).subtree_size < min_leaves {
        return Vec::new();
    }

    if let Some(label) = &source.node(node).label {
        for candidate in target.subtree_ids(target.root()) {
            let other = target.node(candidate);
            if other.subtree_size < min_leaves {
                continue;
            }
            if other.label.as_ref() == Some(label) {
                return vec![ClusterMatch {
                    source: node,
                    target: candidate,
                    label: label.clone(),
                    color: None,
                    equal_branches: None,
                }];
            }
        }
    }

    let mut matches = Vec::new();
    for &child in &source.node(node).children {
        matches.extend(find_matching_clusters(source, child, target, min_leaves));
    }
    matches
}

/// Match two whole trees: [`find_matching_clusters`] from the source root.
pub fn match_trees(
    source: &Dendrogram,
    target: &Dendrogram,
    min_leaves: usize,
) -> Vec<ClusterMatch> {
    let matches = find_matching_clusters(source, source.root(), target, min_leaves);
    info!(
        "found {} matching clusters between '{}' and '{}'",
        matches.len(),
        source.title,
        target.title
    );
    matches
}

/// Fill in match colors from an explicit label-keyed table.
///
/// The table is built once per full matching pass by the caller; labels
/// missing from it leave the color unset.
pub fn assign_colors(matches: &mut [ClusterMatch], table: &HashMap<String, String>) {
    for m in matches.iter_mut() {
        m.color = table.get(&m.label).cloned();
    }
}
