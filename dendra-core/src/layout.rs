//! Geometric layout for dendrogram display
//!
//! Pure coordinate transforms that turn the topological node positions of a
//! [`Dendrogram`] into two-dimensional display coordinates: a conventional
//! top-down dendrogram layout, a −90° rotation into the left-to-right
//! drawing convention, a rescale of the depth axis so spacing follows the
//! recorded clustering distances, and an optional mirror for flipped trees.

use crate::model::{Dendrogram, NodeId};

/// Target drawing region for a layout pass.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Horizontal translation applied after rotation.
    pub offset_x: f64,
    /// Vertical translation applied after rotation.
    pub offset_y: f64,
    /// Pixel span of the depth axis (root to deepest leaf).
    pub width: f64,
    /// Pixel span of the leaf axis.
    pub height: f64,
    /// Pixels reserved for leaf label text when the tree is mirrored.
    pub label_reserve: f64,
}

/// Recompute the display coordinates of every node in `tree`.
///
/// The passes run in order: initial top-down positions, rotation and
/// translation into the viewport, distance-proportional rescaling of the
/// depth axis, and, when the tree's flipped flag is set, mirroring of the
/// depth axis with room for labels.
pub fn update_coordinates(tree: &mut Dendrogram, viewport: &Viewport) {
    assign_initial_positions(tree, viewport);
    rotate_and_translate(tree, viewport);
    scale_x_coordinates(tree);
    if tree.is_flipped() {
        flip_x_coordinates(tree, viewport.label_reserve);
    }
}

/// Conventional top-down dendrogram positions, axes still unswapped:
/// leaves evenly spaced along `x` in traversal order, internal nodes at the
/// mean of their children, depth along `y` proportional to topological
/// depth and scaled to the viewport width.
fn assign_initial_positions(tree: &mut Dendrogram, viewport: &Viewport) {
    let root = tree.root();

    // Depth per node; the preorder arena guarantees parents come first.
    let mut depths = vec![0usize; tree.len()];
    let mut max_depth = 1usize;
    for (id, node) in tree.nodes() {
        if let Some(parent) = node.parent {
            depths[id] = depths[parent] + 1;
            max_depth = max_depth.max(depths[id]);
        }
    }

    let leaf_step = viewport.height / tree.leaf_count().max(1) as f64;
    let depth_step = viewport.width / max_depth as f64;

    let order = tree.subtree_ids(root);
    let mut next_leaf = 0usize;
    for &id in &order {
        let node = tree.node(id);
        if node.is_leaf() {
            let x = (next_leaf as f64 + 0.5) * leaf_step;
            next_leaf += 1;
            let node = tree.node_mut(id);
            node.x = x;
        }
        tree.node_mut(id).y = depths[id] as f64 * depth_step;
    }

    // Internal nodes sit at the mean of their children; reverse arena order
    // visits children first.
    for index in (0..tree.len()).rev() {
        if tree.node(index).is_leaf() {
            continue;
        }
        let children = tree.node(index).children.clone();
        let sum: f64 = children.iter().map(|&c| tree.node(c).x).sum();
        tree.node_mut(index).x = sum / children.len() as f64;
    }
}

/// Rotate every coordinate pair by −90° about the origin, then translate
/// into the viewport. This swaps the depth axis into the horizontal.
fn rotate_and_translate(tree: &mut Dendrogram, viewport: &Viewport) {
    for node in tree.nodes_mut() {
        let (x, y) = (node.x, node.y);
        node.x = y + viewport.offset_x;
        node.y = -x + viewport.offset_y;
    }
}

/// Replace the uniform depth spacing with spacing proportional to the
/// clustering distance recorded on each node: `x` becomes proportional to
/// `(root.distance - node.distance) / root.distance` over the pixel span
/// between the root and the leaves, re-offset by the root's `x`.
fn scale_x_coordinates(tree: &mut Dendrogram) {
    let root = tree.root();
    let root_x = tree.node(root).x;
    let root_distance = tree.node(root).distance;
    if root_distance <= 0.0 {
        // Degenerate tree with no recorded distances; keep uniform spacing.
        return;
    }
    let span = farthest_leaf_x(tree) - root_x;
    for node in tree.nodes_mut() {
        node.x = root_x + (root_distance - node.distance) / root_distance * span;
    }
}

/// Mirror the depth axis for a flipped tree, reserving `label_reserve`
/// pixels for label text at the new leaf end.
fn flip_x_coordinates(tree: &mut Dendrogram, label_reserve: f64) {
    let root_x = tree.node(tree.root()).x;
    let leaf_x = farthest_leaf_x(tree);
    for node in tree.nodes_mut() {
        node.x = label_reserve + root_x + (leaf_x - node.x);
    }
}

fn farthest_leaf_x(tree: &Dendrogram) -> f64 {
    tree.subtree_leaves(tree.root())
        .into_iter()
        .map(|id: NodeId| tree.node(id).x)
        .fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dendrogram;

    fn viewport() -> Viewport {
        Viewport {
            offset_x: 0.0,
            offset_y: 600.0,
            width: 400.0,
            height: 300.0,
            label_reserve: 100.0,
        }
    }

    fn laid_out_tree() -> Dendrogram {
        let mut tree =
            Dendrogram::from_newick("test", "'A':0.5,('B':0.3,'C':0.3):0.2").unwrap();
        update_coordinates(&mut tree, &viewport());
        tree
    }

    #[test]
    fn leaves_are_evenly_spaced_on_the_leaf_axis() {
        let tree = laid_out_tree();
        let ys: Vec<f64> = tree
            .subtree_leaves(tree.root())
            .into_iter()
            .map(|id| tree.node(id).y)
            .collect();
        assert_eq!(ys.len(), 3);
        let gap0 = ys[0] - ys[1];
        let gap1 = ys[1] - ys[2];
        assert!((gap0 - gap1).abs() < 1e-9);
        assert!((gap0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn internal_nodes_sit_at_the_mean_of_their_children() {
        let tree = laid_out_tree();
        for (_, node) in tree.nodes() {
            if node.is_leaf() {
                continue;
            }
            let mean: f64 = node
                .children
                .iter()
                .map(|&c| tree.node(c).y)
                .sum::<f64>()
                / node.children.len() as f64;
            assert!((node.y - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn depth_axis_is_proportional_to_clustering_distance() {
        let tree = laid_out_tree();
        let root = tree.node(tree.root());
        let leaf_x = root.x + 400.0;

        for (_, node) in tree.nodes() {
            let expected =
                root.x + (root.distance - node.distance) / root.distance * (leaf_x - root.x);
            assert!((node.x - expected).abs() < 1e-9);
        }

        // Leaves land on the far edge, the root on the near one.
        for id in tree.subtree_leaves(tree.root()) {
            assert!((tree.node(id).x - leaf_x).abs() < 1e-9);
        }
        assert!((root.x - 0.0).abs() < 1e-9);
    }

    #[test]
    fn flipping_twice_round_trips_every_x() {
        let mut tree =
            Dendrogram::from_newick("test", "'A':0.5,('B':0.3,'C':0.3):0.2").unwrap();
        let viewport = viewport();
        update_coordinates(&mut tree, &viewport);
        let original: Vec<f64> = tree.nodes().map(|(_, n)| n.x).collect();

        tree.toggle_flipped();
        update_coordinates(&mut tree, &viewport);
        let mirrored: Vec<f64> = tree.nodes().map(|(_, n)| n.x).collect();
        assert!(original
            .iter()
            .zip(&mirrored)
            .any(|(a, b)| (a - b).abs() > 1e-9));

        tree.toggle_flipped();
        update_coordinates(&mut tree, &viewport);
        let restored: Vec<f64> = tree.nodes().map(|(_, n)| n.x).collect();
        for (a, b) in original.iter().zip(&restored) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn flipped_layout_reserves_label_room() {
        let mut tree =
            Dendrogram::from_newick("test", "'A':0.5,('B':0.3,'C':0.3):0.2").unwrap();
        let viewport = viewport();
        tree.toggle_flipped();
        update_coordinates(&mut tree, &viewport);

        // Mirrored: the root now sits past the leaves, shifted by the
        // label reserve.
        let root_x = tree.node(tree.root()).x;
        assert!((root_x - (viewport.label_reserve + 400.0)).abs() < 1e-9);
        for id in tree.subtree_leaves(tree.root()) {
            assert!((tree.node(id).x - viewport.label_reserve).abs() < 1e-9);
        }
    }
}
