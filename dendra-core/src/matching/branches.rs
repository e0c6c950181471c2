//! Branch comparison inside a matched cluster pair
//!
//! Propagates leaf-level agreement upward through both subtrees to find the
//! edges that are structurally identical between the two sides, or their
//! complement.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matching::ClusterMatch;
use crate::model::{Dendrogram, NodeId};

/// Which branches of a matched pair get reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightMode {
    /// Report nothing.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Report the structurally identical branches.
    #[serde(rename = "simi")]
    Similarities,
    /// Report the branches that differ.
    #[serde(rename = "diff")]
    Differences,
}

impl FromStr for HighlightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(HighlightMode::None),
            "simi" => Ok(HighlightMode::Similarities),
            "diff" => Ok(HighlightMode::Differences),
            _ => Err(format!("unknown highlight mode: {}", s)),
        }
    }
}

/// Edge-id lists of corresponding branches, one per tree.
///
/// An edge id is the parent's path id concatenated with the child's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EqualBranches {
    /// Edges in the source tree.
    pub source: Vec<String>,
    /// Edges in the target tree.
    pub target: Vec<String>,
}

/// Compute the branch lists for `m` and store them on the match.
pub fn init_equal_branches(
    source: &Dendrogram,
    target: &Dendrogram,
    m: &mut ClusterMatch,
    mode: HighlightMode,
) {
    m.equal_branches = Some(equal_branches(source, target, m.source, m.target, mode));
}

/// Compare the subtrees rooted at `source_root` / `target_root`.
///
/// Matching propagates bottom-up: the worklists start with the leaves of
/// each subtree, and every successful pairing queues both parents, so
/// agreement climbs the two trees level by level. A leaf pairs with a leaf
/// of equal name under an equal parent label; an internal node pairs with
/// an internal node of equal label under an equal parent label. Unset
/// labels never compare equal. Each pairing records the edge into the
/// paired node on both sides.
///
/// `Similarities` returns the paired edges, `Differences` their complement
/// within each subtree (the subtree root's own incoming edge is outside
/// either set), and `None` two empty lists.
pub fn equal_branches(
    source: &Dendrogram,
    target: &Dendrogram,
    source_root: NodeId,
    target_root: NodeId,
    mode: HighlightMode,
) -> EqualBranches {
    if mode == HighlightMode::None {
        return EqualBranches::default();
    }

    let mut source_list = source.subtree_leaves(source_root);
    let mut target_list = target.subtree_leaves(target_root);
    // A node pairs at most once; without this, a parent re-queued by its
    // second child would pair again and duplicate its edge.
    let mut paired_source: HashSet<NodeId> = HashSet::new();
    let mut paired_target: HashSet<NodeId> = HashSet::new();
    let mut equal = EqualBranches::default();

    while let Some(node) = source_list.pop() {
        let Some(parent) = source.node(node).parent else {
            continue;
        };
        let Some(parent_label) = source.node(parent).label.as_deref() else {
            continue;
        };

        let position = target_list
            .iter()
            .position(|&candidate| is_partner(source, node, parent_label, target, candidate));
        let Some(position) = position else {
            continue;
        };
        let partner = target_list.remove(position);
        let Some(target_parent) = target.node(partner).parent else {
            continue;
        };
        paired_source.insert(node);
        paired_target.insert(partner);

        equal.source.push(edge_id(source, parent, node));
        equal.target.push(edge_id(target, target_parent, partner));

        if !paired_source.contains(&parent) && !source_list.contains(&parent) {
            source_list.push(parent);
        }
        if !paired_target.contains(&target_parent) && !target_list.contains(&target_parent) {
            target_list.push(target_parent);
        }
    }

    match mode {
        HighlightMode::Similarities => equal,
        HighlightMode::Differences => EqualBranches {
            source: complement(source, source_root, &equal.source),
            target: complement(target, target_root, &equal.target),
        },
        HighlightMode::None => unreachable!(),
    }
}

/// Partner eligibility for one candidate from the target worklist.
fn is_partner(
    source: &Dendrogram,
    node: NodeId,
    parent_label: &str,
    target: &Dendrogram,
    candidate: NodeId,
) -> bool {
    let other = target.node(candidate);
    let Some(other_parent) = other.parent else {
        return false;
    };
    if target.node(other_parent).label.as_deref() != Some(parent_label) {
        return false;
    }

    let this = source.node(node);
    if this.is_leaf() {
        other.is_leaf() && this.name.is_some() && this.name == other.name
    } else {
        !other.is_leaf() && this.label.is_some() && this.label == other.label
    }
}

/// Edge id of the branch from `parent` into `node`.
fn edge_id(tree: &Dendrogram, parent: NodeId, node: NodeId) -> String {
    format!("{}{}", tree.node(parent).id, tree.node(node).id)
}

/// All edges below `root` (the root's own incoming edge excluded), minus
/// the already-recorded equal edges.
fn complement(tree: &Dendrogram, root: NodeId, equal: &[String]) -> Vec<String> {
    let matched: HashSet<&String> = equal.iter().collect();
    tree.subtree_ids(root)
        .into_iter()
        .filter(|&id| id != root)
        .filter_map(|id| tree.node(id).parent.map(|parent| edge_id(tree, parent, id)))
        .filter(|edge| !matched.contains(edge))
        .collect()
}
