//! Path strings: `/a/b/c` addressing relative to a starting node.

use crate::domain::error::{TreeError, TreeResult};

/// Separator between labels in a path. Never part of a label.
pub const SEPARATOR: char = '/';

/// Label of the root node.
pub const ROOT_LABEL: &str = "/";

/// Split a path string into label tokens.
///
/// The leading separator is required and dropped; a bare separator yields no
/// tokens. Returns `None` for malformed input: missing leading separator or
/// any empty segment (`//`, trailing `/`).
pub fn split_path(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix(SEPARATOR)?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let tokens: Vec<&str> = rest.split(SEPARATOR).collect();
    if tokens.iter().any(|t| t.is_empty()) {
        return None;
    }
    Some(tokens)
}

/// Join labels into a path string; no labels gives the root path.
pub fn join_path<S: AsRef<str>>(labels: &[S]) -> String {
    if labels.is_empty() {
        return ROOT_LABEL.to_string();
    }
    labels.iter().fold(String::new(), |mut acc, label| {
        acc.push(SEPARATOR);
        acc.push_str(label.as_ref());
        acc
    })
}

/// Strip every separator from a raw label.
pub fn sanitize_label(raw: &str) -> String {
    raw.chars().filter(|&c| c != SEPARATOR).collect()
}

/// Check segments used for path creation: non-empty, separator free.
pub fn validate_segments<S: AsRef<str>>(segments: &[S]) -> TreeResult<()> {
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            return Err(TreeError::InvalidPath {
                segment: segment.to_string(),
                reason: "empty segment".to_string(),
            });
        }
        if segment.contains(SEPARATOR) {
            return Err(TreeError::InvalidPath {
                segment: segment.to_string(),
                reason: format!("contains separator '{}'", SEPARATOR),
            });
        }
    }
    Ok(())
}
