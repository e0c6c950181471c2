/// Index of a node within its owning [`Dendrogram`](super::Dendrogram) arena.
///
/// Node ids are only meaningful for the tree that produced them.
pub type NodeId = usize;

/// A single node of a dendrogram.
///
/// Nodes live in the arena owned by their [`Dendrogram`](super::Dendrogram);
/// `children` and `parent` hold arena indices rather than owning pointers, so
/// the child-to-parent back-reference never participates in ownership.
#[derive(Debug, Clone)]
pub struct Node {
    /// Path encoding built during parsing: the root marker `r` followed by
    /// the 0-based sibling index at each depth (e.g. `r`, `r0`, `r01`).
    /// Stable for the lifetime of the tree; mirroring and reordering never
    /// renumber it.
    pub id: String,

    /// Raw identifier from the source text; present only on leaves.
    pub name: Option<String>,

    /// Branch length to the parent node, as parsed. Meaningless on the root.
    pub distance_to_parent: f64,

    /// Cumulative distance from this node down to its leaves; 0 for leaves.
    pub distance: f64,

    /// Synthesized label used for cross-tree matching; unset until label
    /// synthesis runs, and left unset on nodes beyond the cutoff.
    pub label: Option<String>,

    /// Number of leaves in the subtree rooted here; 1 exactly on leaves.
    pub subtree_size: usize,

    /// Ordered children, as arena indices.
    pub children: Vec<NodeId>,

    /// Arena index of the containing node; absent on the root.
    pub parent: Option<NodeId>,

    /// Horizontal display coordinate, written by the layout engine.
    pub x: f64,

    /// Vertical display coordinate, written by the layout engine.
    pub y: f64,
}

impl Node {
    pub(crate) fn internal(id: String, distance_to_parent: f64, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: None,
            distance_to_parent,
            distance: 0.0,
            label: None,
            subtree_size: 0,
            children: Vec::new(),
            parent,
            x: 0.0,
            y: 0.0,
        }
    }

    pub(crate) fn leaf(
        id: String,
        name: String,
        distance_to_parent: f64,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            name: Some(name),
            ..Self::internal(id, distance_to_parent, parent)
        }
    }

    /// Whether this node is a leaf (has no children).
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
