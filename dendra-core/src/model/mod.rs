//! Dendrogram tree model
//!
//! An arena-backed rooted tree plus the derivation passes that prepare it
//! for layout and cross-tree matching: subtree sizes, cumulative distances,
//! leaf and cluster labels, sibling ordering, and coordinate mirroring.

pub mod node;
pub mod tree;

pub use node::{Node, NodeId};
pub use tree::{Dendrogram, STRUCTURE_MARKER};
