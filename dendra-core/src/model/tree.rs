use std::cmp::Ordering;

use tracing::debug;

use crate::error::DendraResult;
use crate::model::{Node, NodeId};
use crate::newick;

/// Marker character wrapped around structured cluster labels, so that a
/// structured label can never collide with a flat token list.
pub const STRUCTURE_MARKER: char = '_';

/// A rooted dendrogram: the exclusive owner of its node arena.
///
/// Nodes are stored in preorder (parents before their descendants), which
/// lets every bottom-up pass run as a plain reverse index scan. Child order
/// within a node is significant and may be rearranged by [`sort`](Self::sort);
/// arena indices and path ids never change after parsing.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    nodes: Vec<Node>,
    /// Display title of this tree.
    pub title: String,
    cutoff: f64,
    flipped: bool,
    leaf_count: usize,
}

impl Dendrogram {
    /// Parse a Newick-style description and derive the structural fields
    /// every later operation relies on: subtree sizes, leaf count,
    /// cumulative distances, and the default cutoff.
    pub fn from_newick(title: impl Into<String>, text: &str) -> DendraResult<Self> {
        let nodes = newick::parse(text)?;
        let mut tree = Self {
            nodes,
            title: title.into(),
            cutoff: 0.0,
            flipped: false,
            leaf_count: 0,
        };
        tree.compute_subtree_sizes();
        tree.init_leaf_count();
        tree.set_distances();
        debug!(
            "dendrogram '{}': {} leaves, root distance {}",
            tree.title, tree.leaf_count, tree.nodes[0].distance
        );
        Ok(tree)
    }

    /// Arena index of the root node.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Borrow a node by its arena index.
    ///
    /// Indices are only valid for the tree that produced them.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// All nodes with their arena indices, in storage (preorder) order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cached number of leaves, set by [`init_leaf_count`](Self::init_leaf_count).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Current distance cutoff bounding label synthesis.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Set the label-synthesis cutoff, clamped into `[0, root.distance]`.
    ///
    /// Out-of-range values are clamped rather than rejected: at cutoff 0
    /// only leaves carry labels, at the root distance every internal node
    /// does, and both extremes are meaningful inputs to matching.
    pub fn set_cutoff(&mut self, value: f64) {
        let max = self.nodes[0].distance;
        self.cutoff = value.clamp(0.0, max.max(0.0));
    }

    /// Whether the tree is drawn mirrored along the depth axis.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Flip the mirror flag. Coordinates are untouched; the layout engine
    /// applies the mirror on its next pass.
    pub fn toggle_flipped(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Preorder traversal of the subtree rooted at `node`, respecting the
    /// current child order. The subtree root itself comes first.
    pub fn subtree_ids(&self, node: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        order
    }

    /// Leaves of the subtree rooted at `node`, in traversal order.
    pub fn subtree_leaves(&self, node: NodeId) -> Vec<NodeId> {
        self.subtree_ids(node)
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .collect()
    }

    /// Set `subtree_size` on every node, bottom-up.
    pub fn compute_subtree_sizes(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let size = if self.nodes[index].is_leaf() {
                1
            } else {
                self.nodes[index]
                    .children
                    .iter()
                    .map(|&child| self.nodes[child].subtree_size)
                    .sum()
            };
            self.nodes[index].subtree_size = size;
        }
    }

    /// Cache the number of leaves.
    pub fn init_leaf_count(&mut self) {
        self.leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
    }

    /// Set the cumulative node-to-leaf `distance` on every node, postorder,
    /// then default the cutoff to half the root distance.
    ///
    /// In a cluster dendrogram all children of a node are leaf-equidistant,
    /// so the first child determines the internal distance.
    pub fn set_distances(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let distance = match self.nodes[index].children.first() {
                None => 0.0,
                Some(&first) => {
                    self.nodes[first].distance_to_parent + self.nodes[first].distance
                }
            };
            self.nodes[index].distance = distance;
        }
        self.cutoff = self.nodes[0].distance / 2.0;
    }

    /// Label every leaf from its name.
    ///
    /// With `trim`, the label is the prefix of the name before the last
    /// occurrence of `separator`; otherwise the full name is used.
    pub fn set_leaf_labels(&mut self, trim: bool, separator: &str) {
        for node in &mut self.nodes {
            if !node.is_leaf() {
                continue;
            }
            if let Some(name) = &node.name {
                let label = match name.rfind(separator) {
                    Some(position) if trim => name[..position].to_string(),
                    _ => name.clone(),
                };
                node.label = Some(label);
            }
        }
    }

    /// Synthesize labels for internal nodes, postorder.
    ///
    /// Nodes whose own `distance` exceeds the cutoff are too close to the
    /// root to participate in matching and keep an unset label. For the
    /// rest, child labels are collected (split into atomic tokens first
    /// unless `keep_duplicates`), sorted lexicographically so matching is
    /// insensitive to branch rotation, deduplicated when requested, and
    /// joined with `separator`. With `keep_structure` the result is wrapped
    /// in [`STRUCTURE_MARKER`] on both ends.
    ///
    /// A node with an unlabeled child stays unlabeled itself.
    pub fn set_labels(&mut self, keep_structure: bool, keep_duplicates: bool, separator: &str) {
        let mut labeled = 0usize;
        for index in (0..self.nodes.len()).rev() {
            if self.nodes[index].is_leaf() {
                continue;
            }
            if self.nodes[index].distance > self.cutoff {
                self.nodes[index].label = None;
                continue;
            }

            let mut tokens: Vec<String> = Vec::new();
            let mut complete = true;
            for &child in &self.nodes[index].children {
                match &self.nodes[child].label {
                    Some(label) if !keep_duplicates => {
                        tokens.extend(label.split(separator).map(str::to_string));
                    }
                    Some(label) => tokens.push(label.clone()),
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if !complete {
                self.nodes[index].label = None;
                continue;
            }

            tokens.sort();
            if !keep_duplicates {
                tokens.dedup();
            }
            let mut label = tokens.join(separator);
            if keep_structure {
                label = format!("{}{}{}", STRUCTURE_MARKER, label, STRUCTURE_MARKER);
            }
            self.nodes[index].label = Some(label);
            labeled += 1;
        }
        debug!(
            "dendrogram '{}': labeled {} internal nodes (cutoff {})",
            self.title, labeled, self.cutoff
        );
    }

    /// Reorder every node's children case-insensitively by label.
    ///
    /// Unset labels order before set ones; two unset labels compare equal,
    /// and the stable sort keeps their original relative order. The set of
    /// descendants under any node is unchanged, only sibling order moves.
    pub fn sort(&mut self) {
        for index in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by(|&a, &b| {
                compare_labels(self.nodes[a].label.as_deref(), self.nodes[b].label.as_deref())
            });
            self.nodes[index].children = children;
        }
    }

    /// Mirror the `y` coordinates of `node` and all its descendants about
    /// the midpoint of the lowest and highest leaf `y` in that subtree.
    /// No-op on leaves.
    pub fn flip_y_node(&mut self, node: NodeId) {
        if self.nodes[node].is_leaf() {
            return;
        }
        let subtree = self.subtree_ids(node);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &id in &subtree {
            if self.nodes[id].is_leaf() {
                min = min.min(self.nodes[id].y);
                max = max.max(self.nodes[id].y);
            }
        }
        for &id in &subtree {
            self.nodes[id].y = min + max - self.nodes[id].y;
        }
    }
}

/// Ordering used by [`Dendrogram::sort`]: unset labels first, then
/// case-insensitive lexicographic order.
fn compare_labels(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_leaf_tree() -> Dendrogram {
        Dendrogram::from_newick("test", "'A':0.5,('B':0.3,'C':0.3):0.2").unwrap()
    }

    #[test]
    fn derives_sizes_distances_and_leaf_count() {
        let tree = three_leaf_tree();
        assert_eq!(tree.leaf_count(), 3);

        let root = tree.node(tree.root());
        assert_eq!(root.subtree_size, 3);
        assert_eq!(root.distance, 0.5);

        let group = root.children[1];
        assert_eq!(tree.node(group).subtree_size, 2);
        assert_eq!(tree.node(group).distance, 0.3);
        assert_eq!(tree.node(group).distance_to_parent, 0.2);
    }

    #[test]
    fn default_cutoff_is_half_the_root_distance() {
        let tree = three_leaf_tree();
        assert_eq!(tree.cutoff(), 0.25);
    }

    #[test]
    fn cutoff_is_clamped_to_the_root_distance() {
        let mut tree = three_leaf_tree();
        tree.set_cutoff(-1.0);
        assert_eq!(tree.cutoff(), 0.0);
        tree.set_cutoff(10.0);
        assert_eq!(tree.cutoff(), 0.5);
        tree.set_cutoff(0.4);
        assert_eq!(tree.cutoff(), 0.4);
    }

    #[test]
    fn leaf_labels_trim_at_the_last_separator() {
        let mut tree =
            Dendrogram::from_newick("test", "'Homo_sapiens_1':0.5,'Pan_troglodytes_2':0.5")
                .unwrap();
        tree.set_leaf_labels(true, "_");
        let labels: Vec<_> = tree
            .nodes()
            .filter(|(_, n)| n.is_leaf())
            .map(|(_, n)| n.label.clone().unwrap())
            .collect();
        assert_eq!(labels, vec!["Homo_sapiens", "Pan_troglodytes"]);

        tree.set_leaf_labels(false, "_");
        let full: Vec<_> = tree
            .nodes()
            .filter(|(_, n)| n.is_leaf())
            .map(|(_, n)| n.label.clone().unwrap())
            .collect();
        assert_eq!(full, vec!["Homo_sapiens_1", "Pan_troglodytes_2"]);
    }

    #[test]
    fn structured_labels_wrap_sorted_children() {
        let mut tree = three_leaf_tree();
        tree.set_cutoff(0.3);
        tree.set_leaf_labels(false, "-");
        tree.set_labels(true, true, "-");

        let group = tree.node(tree.root()).children[1];
        assert_eq!(tree.node(group).label.as_deref(), Some("_B-C_"));
        // The root distance (0.5) exceeds the cutoff.
        assert_eq!(tree.node(tree.root()).label, None);
    }

    #[test]
    fn label_synthesis_is_insensitive_to_branch_rotation() {
        let mut left = Dendrogram::from_newick("l", "('B':0.3,'C':0.3):0.2,'A':0.5").unwrap();
        let mut right = Dendrogram::from_newick("r", "'A':0.5,('C':0.3,'B':0.3):0.2").unwrap();
        for tree in [&mut left, &mut right] {
            tree.set_cutoff(0.3);
            tree.set_leaf_labels(false, "-");
            tree.set_labels(true, true, "-");
        }
        let label_of = |tree: &Dendrogram| {
            tree.nodes()
                .find(|(_, n)| !n.is_leaf() && n.label.is_some())
                .map(|(_, n)| n.label.clone().unwrap())
        };
        assert_eq!(label_of(&left), label_of(&right));
        assert_eq!(label_of(&left).as_deref(), Some("_B-C_"));
    }

    #[test]
    fn flat_labels_split_composites_and_dedup() {
        // Two sibling groups labeled "a-b" and "b-c"; without duplicates the
        // parent recovers the atomic tokens a, b, c.
        let mut tree = Dendrogram::from_newick(
            "test",
            "(('a':0.1,'b':0.1):0.1,('b':0.1,'c':0.1):0.1):0.3",
        )
        .unwrap();
        tree.set_cutoff(tree.node(tree.root()).distance);
        tree.set_leaf_labels(false, "-");
        tree.set_labels(false, false, "-");

        let outer = tree.node(tree.root()).children[0];
        assert_eq!(tree.node(outer).label.as_deref(), Some("a-b-c"));
    }

    #[test]
    fn sort_orders_children_and_is_idempotent() {
        let mut tree = Dendrogram::from_newick(
            "test",
            "'delta':0.4,('Beta':0.2,'alpha':0.2):0.2,'Camma':0.4",
        )
        .unwrap();
        tree.set_leaf_labels(false, "-");
        tree.set_labels(true, true, "-");
        tree.sort();

        let once: Vec<NodeId> = tree.node(tree.root()).children.clone();
        tree.sort();
        assert_eq!(tree.node(tree.root()).children, once);

        let labels: Vec<_> = once
            .iter()
            .map(|&c| tree.node(c).label.clone().unwrap())
            .collect();
        let mut sorted = labels.clone();
        sorted.sort_by_key(|l| l.to_lowercase());
        assert_eq!(labels, sorted);
    }

    #[test]
    fn sort_puts_unlabeled_children_first() {
        let mut tree = Dendrogram::from_newick(
            "test",
            "'zeta':0.1,('a':0.4,'b':0.4):0.6",
        )
        .unwrap();
        tree.set_leaf_labels(false, "-");
        // Group distance 0.4 exceeds the default cutoff 0.25: no label.
        tree.set_labels(true, true, "-");
        tree.sort();

        let children = &tree.node(tree.root()).children;
        assert!(tree.node(children[0]).label.is_none());
        assert_eq!(tree.node(children[1]).label.as_deref(), Some("zeta"));
    }

    #[test]
    fn sort_preserves_the_leaf_multiset() {
        let mut tree = Dendrogram::from_newick(
            "test",
            "('d':0.1,'c':0.1):0.2,('b':0.1,'a':0.1):0.2",
        )
        .unwrap();
        let mut before: Vec<String> = tree
            .subtree_leaves(tree.root())
            .into_iter()
            .map(|id| tree.node(id).name.clone().unwrap())
            .collect();
        tree.set_leaf_labels(false, "-");
        tree.set_labels(true, true, "-");
        tree.sort();
        let mut after: Vec<String> = tree
            .subtree_leaves(tree.root())
            .into_iter()
            .map(|id| tree.node(id).name.clone().unwrap())
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn flip_y_mirrors_about_the_leaf_midline() {
        let mut tree = three_leaf_tree();
        // Hand-assigned coordinates stand in for a layout pass.
        let ids = tree.subtree_leaves(tree.root());
        for (position, id) in ids.iter().enumerate() {
            tree.node_mut(*id).y = position as f64 * 10.0;
        }
        tree.flip_y_node(tree.root());
        let ys: Vec<f64> = ids.iter().map(|&id| tree.node(id).y).collect();
        assert_eq!(ys, vec![20.0, 10.0, 0.0]);

        // Leaves keep the midline; flipping twice restores the original.
        tree.flip_y_node(tree.root());
        let restored: Vec<f64> = ids.iter().map(|&id| tree.node(id).y).collect();
        assert_eq!(restored, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn flip_y_is_a_noop_on_leaves() {
        let mut tree = three_leaf_tree();
        let leaf = tree.node(tree.root()).children[0];
        tree.node_mut(leaf).y = 7.0;
        tree.flip_y_node(leaf);
        assert_eq!(tree.node(leaf).y, 7.0);
    }

    #[test]
    fn toggle_flipped_only_touches_the_flag() {
        let mut tree = three_leaf_tree();
        assert!(!tree.is_flipped());
        tree.toggle_flipped();
        assert!(tree.is_flipped());
        tree.toggle_flipped();
        assert!(!tree.is_flipped());
    }

    #[test]
    fn path_sums_equal_the_root_distance_for_every_leaf() {
        let tree = three_leaf_tree();
        for leaf in tree.subtree_leaves(tree.root()) {
            let mut sum = 0.0;
            let mut current = leaf;
            while let Some(parent) = tree.node(current).parent {
                sum += tree.node(current).distance_to_parent;
                current = parent;
            }
            assert!((sum - tree.node(tree.root()).distance).abs() < 1e-9);
        }
    }
}
