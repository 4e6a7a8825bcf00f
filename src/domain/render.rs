//! Structural output: termtree-style drawings and JSON.
//!
//! Only the owning direction (children) is followed; parent links are never
//! emitted. Both writers walk the arena with an explicit stack, so output
//! does not depend on the call stack however deep the tree is.

use std::fmt;

use generational_arena::Index;
use serde::Serialize;
use termtree::GlyphPalette;

use crate::domain::arena::{LabelTree, TreeNode};
use crate::domain::error::TreeResult;
use crate::domain::node::NodeRef;

const GLYPHS: GlyphPalette = GlyphPalette::new();

fn node_line<T: fmt::Debug>(node: &TreeNode<T>) -> String {
    match node.data() {
        Some(data) => format!("{} [{}] = {:?}", node.label(), node.id(), data),
        None => format!("{} [{}]", node.label(), node.id()),
    }
}

/// Push `node`'s children so they pop in order, flagging the last one.
fn push_children<T, F, O>(node: &TreeNode<T>, frame: F, stack: &mut Vec<O>)
where
    F: Fn(Index, bool) -> O,
{
    let count = node.children().len();
    for (i, &child) in node.children().iter().enumerate().rev() {
        stack.push(frame(child, i + 1 == count));
    }
}

impl<T: fmt::Debug> LabelTree<T> {
    /// Indented drawing of the whole tree, one line per node.
    pub fn render(&self) -> String {
        self.draw(self.root()).unwrap_or_default()
    }

    /// Drawing of the subtree below `idx`; `None` for stale handles.
    pub fn render_node(&self, idx: Index) -> Option<String> {
        self.draw(idx)
    }

    /// Same layout as a `termtree::Tree` with the default glyphs.
    fn draw(&self, start: Index) -> Option<String> {
        let first = self.get_node(start)?;
        let mut out = node_line(first);
        out.push('\n');

        // Whether each ancestor below `start` was the last of its siblings.
        let mut lasts: Vec<bool> = Vec::new();
        let mut stack: Vec<(Index, usize, bool)> = Vec::new();
        push_children(first, |child, last| (child, 1, last), &mut stack);

        while let Some((idx, level, last)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            lasts.truncate(level - 1);
            for &ancestor_last in &lasts {
                out.push_str(if ancestor_last {
                    GLYPHS.last_skip
                } else {
                    GLYPHS.middle_skip
                });
                out.push_str(GLYPHS.skip_indent);
            }
            out.push_str(if last {
                GLYPHS.last_item
            } else {
                GLYPHS.middle_item
            });
            out.push_str(GLYPHS.item_indent);
            out.push_str(&node_line(node));
            out.push('\n');

            lasts.push(last);
            push_children(node, |child, last| (child, level + 1, last), &mut stack);
        }
        Some(out)
    }
}

impl<T: fmt::Debug> fmt::Display for LabelTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

enum Step {
    /// Comma (unless first) and line break before a child object.
    Lead { level: usize, comma: bool },
    Open { idx: Index, level: usize },
    /// End of a non-empty children array and its object.
    Close { level: usize },
}

/// Writes `{id, label, data, children}` objects, pretty or compact.
///
/// Pretty output matches `serde_json::to_string_pretty` of the same shape.
struct JsonWriter {
    out: String,
    pretty: bool,
}

impl JsonWriter {
    fn new(pretty: bool) -> Self {
        Self {
            out: String::new(),
            pretty,
        }
    }

    fn newline(&mut self, level: usize) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..level {
                self.out.push_str("  ");
            }
        }
    }

    fn key(&mut self, level: usize, name: &str, first: bool) {
        if !first {
            self.out.push(',');
        }
        self.newline(level);
        self.out.push('"');
        self.out.push_str(name);
        self.out.push_str(if self.pretty { "\": " } else { "\":" });
    }

    fn value<V: Serialize + ?Sized>(&mut self, value: &V, level: usize) -> TreeResult<()> {
        if self.pretty {
            let text = serde_json::to_string_pretty(value)?;
            let mut lines = text.split('\n');
            if let Some(head) = lines.next() {
                self.out.push_str(head);
            }
            for line in lines {
                self.newline(level);
                self.out.push_str(line);
            }
        } else {
            self.out.push_str(&serde_json::to_string(value)?);
        }
        Ok(())
    }

    fn subtree<T: Serialize>(&mut self, tree: &LabelTree<T>, start: Index, level: usize) -> TreeResult<()> {
        let mut stack = vec![Step::Open { idx: start, level }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Lead { level, comma } => {
                    if comma {
                        self.out.push(',');
                    }
                    self.newline(level);
                }
                Step::Open { idx, level } => {
                    let Some(node) = tree.get_node(idx) else {
                        continue;
                    };
                    let fields = level + 1;
                    self.out.push('{');
                    self.key(fields, "id", true);
                    self.value(&node.id(), fields)?;
                    self.key(fields, "label", false);
                    self.value(node.label(), fields)?;
                    self.key(fields, "data", false);
                    self.value(&node.data(), fields)?;
                    self.key(fields, "children", false);
                    self.out.push('[');
                    if node.is_leaf() {
                        self.out.push(']');
                        self.newline(level);
                        self.out.push('}');
                        continue;
                    }
                    stack.push(Step::Close { level });
                    for (i, &child) in node.children().iter().enumerate().rev() {
                        stack.push(Step::Open {
                            idx: child,
                            level: level + 2,
                        });
                        stack.push(Step::Lead {
                            level: level + 2,
                            comma: i > 0,
                        });
                    }
                }
                Step::Close { level } => {
                    self.newline(level + 1);
                    self.out.push(']');
                    self.newline(level);
                    self.out.push('}');
                }
            }
        }
        Ok(())
    }
}

impl<T: Serialize> LabelTree<T> {
    /// Pretty-printed JSON of the reachable tree: `{"root": {...}}`.
    pub fn to_json(&self) -> TreeResult<String> {
        self.write_json(true)
    }

    /// Single-line JSON, same shape as [`to_json`](Self::to_json).
    pub fn to_json_compact(&self) -> TreeResult<String> {
        self.write_json(false)
    }

    fn write_json(&self, pretty: bool) -> TreeResult<String> {
        let mut writer = JsonWriter::new(pretty);
        writer.out.push('{');
        writer.key(1, "root", true);
        writer.subtree(self, self.root(), 1)?;
        writer.newline(0);
        writer.out.push('}');
        Ok(writer.out)
    }
}

impl<T: Serialize> NodeRef<'_, T> {
    /// Pretty-printed JSON of this node and everything below it.
    pub fn to_json(&self) -> TreeResult<String> {
        let mut writer = JsonWriter::new(true);
        writer.subtree(self.tree(), self.index(), 0)?;
        Ok(writer.out)
    }
}
