//! Parser for Newick-style dendrogram descriptions.
//!
//! The accepted input is a single *unrooted* description: a comma-separated
//! list of child expressions, where an expression is either a quoted leaf
//! (`'name':distance`) or a parenthesized group (`(children):distance`).
//! The caller is responsible for stripping any trailing semicolon, outer
//! root parentheses, and root distance before handing the text over.
//!
//! Parsing builds the node arena consumed by
//! [`Dendrogram`](crate::model::Dendrogram): nodes are stored in preorder
//! with the synthesized root at index 0, so scanning indices in reverse
//! visits children before their parents.

use tracing::debug;

use crate::error::{DendraError, DendraResult};
use crate::model::{Node, NodeId};

/// Id of the synthesized root node.
pub const ROOT_ID: &str = "r";

/// Parse an unrooted Newick-style description into a node arena.
///
/// The returned vector stores nodes in preorder; the synthesized root is at
/// index 0. On any structural problem (unbalanced parentheses, a missing
/// distance, an empty child list, an unparseable or negative distance) the
/// whole parse fails; no partial arena is ever returned.
pub fn parse(text: &str) -> DendraResult<Vec<Node>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DendraError::Parse("empty tree description".to_string()));
    }
    check_balanced(text)?;

    let mut nodes = vec![Node::internal(ROOT_ID.to_string(), 0.0, None)];
    parse_children(text, 0, &mut nodes)?;

    debug!(
        "parsed dendrogram description: {} nodes, {} leaves",
        nodes.len(),
        nodes.iter().filter(|n| n.is_leaf()).count()
    );
    Ok(nodes)
}

/// Reject input whose parentheses do not balance.
fn check_balanced(text: &str) -> DendraResult<()> {
    let mut depth: i64 = 0;
    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(DendraError::Parse(format!(
                        "unbalanced parentheses: unexpected ')' at byte {}",
                        index
                    )));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(DendraError::Parse(format!(
            "unbalanced parentheses: {} unclosed '('",
            depth
        )));
    }
    Ok(())
}

/// Split a child list on the commas that sit at bracket depth zero.
///
/// A comma whose preceding substring holds an unbalanced count of `(`/`)`
/// belongs to a deeper nesting level and is skipped.
fn split_siblings(list: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth: i64 = 0;
    let mut start = 0;
    for (index, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push(&list[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    pieces.push(&list[start..]);
    pieces
}

/// Parse one comma-separated child list, appending the children of `parent`
/// to the arena in preorder.
fn parse_children(list: &str, parent: NodeId, nodes: &mut Vec<Node>) -> DendraResult<()> {
    for (index, piece) in split_siblings(list).into_iter().enumerate() {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(DendraError::Parse(format!(
                "empty child expression in '{}'",
                list
            )));
        }

        // The distance sits after the *last* colon; everything before it is
        // either a quoted leaf name or a parenthesized group.
        let (key, value) = piece.rsplit_once(':').ok_or_else(|| {
            DendraError::Parse(format!("missing distance on '{}'", piece))
        })?;
        let distance_to_parent: f64 = value.trim().parse().map_err(|_| {
            DendraError::Parse(format!("invalid distance '{}'", value.trim()))
        })?;
        if !distance_to_parent.is_finite() || distance_to_parent < 0.0 {
            return Err(DendraError::Parse(format!(
                "distance '{}' on '{}' is not a non-negative number",
                value.trim(),
                piece
            )));
        }

        let id = format!("{}{}", nodes[parent].id, index);
        let key = key.trim();
        if !key.contains(':') {
            let name = key.trim_matches('\'').to_string();
            let child = nodes.len();
            nodes.push(Node::leaf(id, name, distance_to_parent, Some(parent)));
            nodes[parent].children.push(child);
        } else {
            let inner = key
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(|| {
                    DendraError::Parse(format!("expected parenthesized group, got '{}'", key))
                })?;
            let child = nodes.len();
            nodes.push(Node::internal(id, distance_to_parent, Some(parent)));
            nodes[parent].children.push(child);
            parse_children(inner, child, nodes)?;
        }
    }
    Ok(())
}
