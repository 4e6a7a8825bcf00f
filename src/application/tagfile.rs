//! Tag listings: plain-text files describing a tag namespace.
//!
//! One tag per line, `/seg/seg/leaf` optionally followed by `= value`.
//! Blank lines and `#` comments are skipped.
//!
//! ```text
//! # boiler plant
//! /pressures/P42 = uint32:23.23
//! /Machine/Heating/Zones/Zone1/SetTemperature
//! ```

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{split_path, LabelTree, RandomIds, TreeOptions};

const TAG_LINE_PATTERN: &str = r"^(?P<path>[^=]+?)\s*(?:=\s*(?P<value>.*))?$";

/// Builds `LabelTree<String>` values from tag listings.
pub struct TagLoader {
    line_regex: Regex,
    options: TreeOptions,
}

impl Default for TagLoader {
    fn default() -> Self {
        Self::new(TreeOptions::default())
    }
}

impl TagLoader {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            line_regex: Regex::new(TAG_LINE_PATTERN).expect("tag line pattern is valid"),
            options,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_file(&self, path: &Path) -> ApplicationResult<LabelTree<String>> {
        let content = fs::read_to_string(path).with_path_context("read tag file", path)?;
        let mut tree = LabelTree::with_options(self.options, RandomIds);
        self.load_into(&mut tree, &content, path)?;
        Ok(tree)
    }

    /// Add every tag in `content` to `tree`; `origin` only labels errors.
    ///
    /// A tag that already exists keeps its node; a given value replaces the
    /// node's payload.
    pub fn load_into(
        &self,
        tree: &mut LabelTree<String>,
        content: &str,
        origin: &Path,
    ) -> ApplicationResult<usize> {
        let mut count = 0;
        for (no, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tag_err = |message: String| ApplicationError::TagFile {
                path: origin.to_path_buf(),
                line: no + 1,
                message,
            };

            let caps = self
                .line_regex
                .captures(line)
                .ok_or_else(|| tag_err(format!("unparsable line: {}", line)))?;
            let path = caps.name("path").map(|m| m.as_str()).unwrap_or_default();
            let value = caps.name("value").map(|m| m.as_str().to_string());

            let tokens = split_path(path).ok_or_else(|| tag_err(format!("malformed path: {}", path)))?;
            let Some((leaf, parents)) = tokens.split_last() else {
                return Err(tag_err("the root cannot be a tag".to_string()));
            };

            let root = tree.root();
            if let Some(existing) = tree.resolve_path_tokens(root, &tokens) {
                if let (Some(value), Some(node)) = (value, tree.get_node_mut(existing)) {
                    node.set_data(Some(value));
                }
            } else {
                let id = tree.next_id();
                let node = tree.new_detached_node(id, leaf, value);
                if let Err(e) = tree.insert_at_path(root, parents, [node]) {
                    tree.discard_detached(node);
                    return Err(tag_err(e.to_string()));
                }
            }
            debug!(path, "tag loaded");
            count += 1;
        }
        Ok(count)
    }

    pub fn load_str(&self, content: &str, origin: &Path) -> ApplicationResult<LabelTree<String>> {
        let mut tree = LabelTree::with_options(self.options, RandomIds);
        self.load_into(&mut tree, content, origin)?;
        Ok(tree)
    }
}

/// Write a tree back as a tag listing.
///
/// Leaves and nodes carrying a value get a line, in pre-order; intermediate
/// nodes without a value are implied by their descendants.
pub fn to_listing(tree: &LabelTree<String>) -> String {
    let mut out = String::new();
    for (idx, node) in tree.iter().skip(1) {
        if !node.is_leaf() && node.data().is_none() {
            continue;
        }
        let Some(path) = tree.path_of(idx) else {
            continue;
        };
        out.push_str(&path);
        if let Some(value) = node.data() {
            out.push_str(" = ");
            out.push_str(value);
        }
        out.push('\n');
    }
    out
}
