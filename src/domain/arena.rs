use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::ids::{IdSource, RandomIds};
use crate::domain::path::{self, ROOT_LABEL};

/// Behaviour switches for a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Reject a child whose label is already used by a sibling.
    ///
    /// Off by default: siblings may share a label, and path lookups then
    /// address only the first of them.
    pub unique_sibling_labels: bool,
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode<T> {
    id: Uuid,
    label: String,
    data: Option<T>,
    /// Index of parent node in the arena, None for the root and detached nodes
    parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    children: Vec<Index>,
}

impl<T> TreeNode<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    /// Replace the payload, returning the previous one.
    pub fn set_data(&mut self, data: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.data, data)
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Labeled, ordered tree with a fixed root.
///
/// All nodes live in one generational arena. Children are owned through the
/// parent's child list; the parent link is a plain index and never keeps a
/// node alive. Removing a subtree frees its slots, so handles to removed
/// nodes simply stop resolving.
#[derive(Debug)]
pub struct LabelTree<T> {
    arena: Arena<TreeNode<T>>,
    root: Index,
    ids: Box<dyn IdSource>,
    options: TreeOptions,
}

impl<T> Default for LabelTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LabelTree<T> {
    /// Empty tree with random node ids.
    pub fn new() -> Self {
        Self::with_id_source(RandomIds)
    }

    pub fn with_id_source(ids: impl IdSource + 'static) -> Self {
        Self::with_options(TreeOptions::default(), ids)
    }

    pub fn with_options(options: TreeOptions, ids: impl IdSource + 'static) -> Self {
        let mut ids: Box<dyn IdSource> = Box::new(ids);
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            id: ids.next_id(),
            label: ROOT_LABEL.to_string(),
            data: None,
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            ids,
            options,
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    /// The root is created with the tree and can never be removed.
    pub(crate) fn root_node(&self) -> &TreeNode<T> {
        &self.arena[self.root]
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    /// Draw a fresh id from the tree's id source.
    pub fn next_id(&mut self) -> Uuid {
        self.ids.next_id()
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<T>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode<T>> {
        self.arena.get_mut(idx)
    }

    /// True if the handle still refers to a live node (attached or not).
    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// True if the node is reachable from the root.
    pub fn is_attached(&self, idx: Index) -> bool {
        self.lineage(idx).last() == Some(&self.root)
    }

    /// The node followed by its ancestors, nearest first.
    fn lineage(&self, idx: Index) -> Vec<Index> {
        let mut chain = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            match self.arena.get(i) {
                Some(node) => {
                    chain.push(i);
                    current = node.parent;
                }
                None => break,
            }
        }
        chain
    }

    /// Create a node that belongs to this tree but has no parent yet.
    ///
    /// Separators are stripped from `label`; an empty result falls back to
    /// the textual form of `id`.
    ///
    /// The node occupies an arena slot until it is attached and later
    /// destroyed, or freed with [`discard_detached`](Self::discard_detached).
    /// Nothing sweeps unattached nodes, so callers that build a batch by hand
    /// must discard the leftovers when attaching fails.
    #[instrument(level = "trace", skip(self, data))]
    pub fn new_detached_node(&mut self, id: Uuid, label: &str, data: Option<T>) -> Index {
        let mut label = path::sanitize_label(label);
        if label.is_empty() {
            label = id.to_string();
        }
        self.arena.insert(TreeNode {
            id,
            label,
            data,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Create a node and append it to `parent`'s children.
    #[instrument(level = "trace", skip(self, data))]
    pub fn create_child(
        &mut self,
        parent: Index,
        id: Uuid,
        label: &str,
        data: Option<T>,
    ) -> TreeResult<Index> {
        if !self.arena.contains(parent) {
            return Err(TreeError::NodeNotFound(parent));
        }
        let child = self.new_detached_node(id, label, data);
        if let Err(e) = self.attach_children(parent, [child]) {
            self.arena.remove(child);
            return Err(e);
        }
        Ok(child)
    }

    /// Append detached nodes to `parent`'s children, in order.
    ///
    /// The whole batch is checked before anything changes. Returns `parent`.
    #[instrument(level = "trace", skip(self, nodes))]
    pub fn attach_children(
        &mut self,
        parent: Index,
        nodes: impl IntoIterator<Item = Index>,
    ) -> TreeResult<Index> {
        let nodes: Vec<Index> = nodes.into_iter().collect();
        self.validate_attach(parent, &nodes)?;

        for &idx in &nodes {
            if let Some(node) = self.arena.get_mut(idx) {
                node.parent = Some(parent);
            }
        }
        if let Some(target) = self.arena.get_mut(parent) {
            target.children.extend(nodes.iter().copied());
        }
        Ok(parent)
    }

    fn validate_attach(&self, parent: Index, nodes: &[Index]) -> TreeResult<()> {
        let target = self
            .arena
            .get(parent)
            .ok_or(TreeError::NodeNotFound(parent))?;
        // Only a node with children can be a proper ancestor of `parent`.
        let mut lineage: Option<Vec<Index>> = None;
        let unique = self.options.unique_sibling_labels;

        let mut labels: HashSet<&str> = HashSet::new();
        if unique {
            labels.extend(
                target
                    .children
                    .iter()
                    .filter_map(|&c| self.arena.get(c))
                    .map(|c| c.label.as_str()),
            );
        }

        let mut seen = HashSet::new();
        for &idx in nodes {
            let node = self.arena.get(idx).ok_or(TreeError::NodeNotFound(idx))?;
            let is_ancestor = idx == parent
                || (!node.children.is_empty()
                    && lineage
                        .get_or_insert_with(|| self.lineage(parent))
                        .contains(&idx));
            if idx == self.root || is_ancestor {
                return Err(TreeError::CycleDetected {
                    label: node.label.clone(),
                });
            }
            if node.parent.is_some() || !seen.insert(idx) {
                return Err(TreeError::AlreadyAttached {
                    label: node.label.clone(),
                });
            }
            if unique && !labels.insert(node.label.as_str()) {
                return Err(TreeError::DuplicateLabel {
                    label: node.label.clone(),
                });
            }
        }
        Ok(())
    }

    /// Children of `node` accepted by `predicate`, in child order.
    ///
    /// Stops after `max_matches` hits; 0 means no limit. An unknown `node`
    /// has no children.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_children_matching<P>(
        &self,
        node: Index,
        mut predicate: P,
        max_matches: usize,
    ) -> Vec<Index>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        let mut matches = Vec::new();
        let Some(parent) = self.arena.get(node) else {
            return matches;
        };
        for &child in &parent.children {
            let Some(candidate) = self.arena.get(child) else {
                continue;
            };
            if predicate(candidate) {
                matches.push(child);
                if max_matches > 0 && matches.len() == max_matches {
                    break;
                }
            }
        }
        matches
    }

    pub fn find_child_matching<P>(&self, node: Index, predicate: P) -> Option<Index>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        self.find_children_matching(node, predicate, 1)
            .into_iter()
            .next()
    }

    pub fn find_child_by_label(&self, node: Index, label: &str) -> Option<Index> {
        self.find_child_matching(node, |child| child.label == label)
    }

    pub fn find_child_by_id(&self, node: Index, id: Uuid) -> Option<Index> {
        self.find_child_matching(node, |child| child.id == id)
    }

    /// Attach `nodes` below the node reached by following `segments` from
    /// `node`, creating any missing segment on the way.
    ///
    /// Existing segments are reused (first child with a matching label), so
    /// repeating a call only adds the attached nodes again. Created segments
    /// get an id from the tree's id source and no payload. If attaching fails,
    /// segments created by this call are removed again. Returns the node the
    /// batch was attached to.
    #[instrument(level = "debug", skip(self, segments, nodes), fields(depth = segments.len()))]
    pub fn insert_at_path<S: AsRef<str>>(
        &mut self,
        node: Index,
        segments: &[S],
        nodes: impl IntoIterator<Item = Index>,
    ) -> TreeResult<Index> {
        path::validate_segments(segments)?;
        if !self.arena.contains(node) {
            return Err(TreeError::NodeNotFound(node));
        }

        let mut current = node;
        let mut first_created = None;
        for segment in segments {
            let segment = segment.as_ref();
            current = match self.find_child_by_label(current, segment) {
                Some(existing) => existing,
                None => {
                    let id = self.ids.next_id();
                    debug!(segment, %id, "creating intermediate node");
                    let created = self.create_child(current, id, segment, None)?;
                    first_created.get_or_insert(created);
                    created
                }
            };
        }

        if let Err(e) = self.attach_children(current, nodes) {
            if let Some(created) = first_created {
                self.destroy(created);
            }
            return Err(e);
        }
        Ok(current)
    }

    /// Resolve a `/a/b/c` path from the root.
    pub fn resolve_path(&self, path: &str) -> Option<Index> {
        self.resolve_path_from(self.root, path)
    }

    /// Resolve a `/a/b/c` path relative to `node`; `/` is `node` itself.
    ///
    /// Malformed paths (no leading separator, empty segments) resolve to
    /// nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve_path_from(&self, node: Index, path: &str) -> Option<Index> {
        let tokens = path::split_path(path)?;
        self.resolve_path_tokens(node, &tokens)
    }

    /// Follow labels one level per token; no tokens resolves to `node`.
    pub fn resolve_path_tokens<S: AsRef<str>>(&self, node: Index, tokens: &[S]) -> Option<Index> {
        if !self.arena.contains(node) {
            return None;
        }
        let mut current = node;
        for token in tokens {
            current = self.find_child_by_label(current, token.as_ref())?;
        }
        Some(current)
    }

    /// Detach `node` from its parent and drop its whole subtree.
    ///
    /// Returns false, leaving the tree untouched, for the root, for nodes
    /// without a parent, and for stale handles.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, node: Index) -> bool {
        let Some(parent) = self.arena.get(node).and_then(|n| n.parent) else {
            return false;
        };
        let Some(siblings) = self.arena.get_mut(parent).map(|p| &mut p.children) else {
            return false;
        };
        let Some(pos) = siblings.iter().position(|&c| c == node) else {
            return false;
        };
        siblings.remove(pos);
        let removed = self.remove_subtree(node);
        debug!(removed, "subtree removed");
        true
    }

    /// Free a node that was never attached, together with anything below it.
    pub fn discard_detached(&mut self, node: Index) -> bool {
        match self.arena.get(node) {
            Some(n) if n.parent.is_none() && node != self.root => {
                self.remove_subtree(node);
                true
            }
            _ => false,
        }
    }

    fn remove_subtree(&mut self, node: Index) -> usize {
        let mut stack = vec![node];
        let mut removed = 0;
        while let Some(idx) = stack.pop() {
            if let Some(n) = self.arena.remove(idx) {
                stack.extend(n.children);
                removed += 1;
            }
        }
        removed
    }

    /// Path of an attached node, built by walking parent links.
    pub fn path_of(&self, node: Index) -> Option<String> {
        let lineage = self.lineage(node);
        if lineage.last() != Some(&self.root) {
            return None;
        }
        let labels: Vec<&str> = lineage
            .iter()
            .rev()
            .skip(1)
            .filter_map(|&i| self.arena.get(i))
            .map(|n| n.label.as_str())
            .collect();
        Some(path::join_path(&labels))
    }

    /// Pre-order traversal of everything reachable from the root.
    pub fn iter(&self) -> TreeIterator<'_, T> {
        self.iter_from(self.root)
    }

    pub fn iter_from(&self, node: Index) -> TreeIterator<'_, T> {
        TreeIterator::new(self, node)
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels, counting the root as level 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, level)) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|&child| (child, level + 1)));
        }
        deepest
    }

    /// Paths of all reachable leaves below the root, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        // Labels from the root's child down to the node being visited.
        let mut labels: Vec<&str> = Vec::new();
        let mut stack: Vec<(Index, usize)> = match self.arena.get(self.root) {
            Some(root) => root.children.iter().rev().map(|&c| (c, 1)).collect(),
            None => Vec::new(),
        };
        while let Some((idx, level)) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            labels.truncate(level - 1);
            labels.push(&node.label);
            if node.children.is_empty() {
                leaves.push(path::join_path(labels.as_slice()));
            } else {
                stack.extend(node.children.iter().rev().map(|&c| (c, level + 1)));
            }
        }
        leaves
    }
}

pub struct TreeIterator<'a, T> {
    tree: &'a LabelTree<T>,
    stack: Vec<Index>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a LabelTree<T>, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (Index, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
