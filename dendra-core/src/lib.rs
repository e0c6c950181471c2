//! Core engine for visually comparing hierarchical clustering dendrograms
//!
//! Parses Newick-style tree descriptions into an owned node arena, derives
//! per-node distances and labels, matches sub-clusters across trees by
//! label equivalence, compares branches inside matched pairs, and computes
//! the geometric transforms that position nodes for display. Rendering,
//! export, and interaction live with external collaborators that consume
//! these outputs.

pub mod config;
pub mod error;
pub mod layout;
pub mod matching;
pub mod model;
pub mod newick;

// Re-export commonly used types
pub use config::{load_config, save_config, Config, LabelConfig, LayoutConfig, MatchConfig};
pub use error::{DendraError, DendraResult};
pub use layout::{update_coordinates, Viewport};
pub use matching::{
    assign_colors, equal_branches, find_matching_clusters, init_equal_branches, match_trees,
    ClusterMatch, EqualBranches, HighlightMode,
};
pub use model::{Dendrogram, Node, NodeId, STRUCTURE_MARKER};

/// Version information for the Dendra project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
