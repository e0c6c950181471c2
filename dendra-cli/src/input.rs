//! Reading and normalizing Newick input files
//!
//! The core parser expects a bare, unrooted child list: no terminating
//! semicolon, no outer root parentheses, no root distance. Stripping those
//! decorations from files written in common Newick form is the caller's
//! job, so it happens here.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Read a dendrogram description from `path` and normalize it for the
/// core parser.
pub fn read_tree_file(path: &Path) -> anyhow::Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tree file {}", path.display()))?;
    Ok(normalize(&text).to_string())
}

/// Strip surrounding whitespace, one trailing semicolon, and one outer
/// root parenthesis pair (with its optional root distance) when the pair
/// wraps the entire description.
pub fn normalize(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(stripped) = s.strip_suffix(';') {
        s = stripped.trim_end();
    }

    if s.starts_with('(') {
        if let Some(close) = matching_close(s) {
            let rest = &s[close + 1..];
            // Only a whole-description wrapper may be removed: either
            // nothing follows the closing parenthesis, or only the root's
            // own distance does.
            let is_root_distance =
                rest.starts_with(':') && !rest.contains(',') && !rest.contains('(');
            if rest.is_empty() || is_root_distance {
                s = s[1..close].trim();
            }
        }
    }
    s
}

/// Byte index of the parenthesis closing the opening one at index 0, if
/// the text is balanced that far.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 0i64;
    for (index, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}
