//! Borrowed cursors over single nodes.
//!
//! `NodeRef` reads, `NodeMut` mutates; both carry the owning tree so node
//! operations read as calls on the node itself.

use generational_arena::Index;
use uuid::Uuid;

use crate::domain::arena::{LabelTree, TreeNode};
use crate::domain::error::{TreeError, TreeResult};

/// Read-only view of a live node.
#[derive(Debug)]
pub struct NodeRef<'a, T> {
    tree: &'a LabelTree<T>,
    index: Index,
    node: &'a TreeNode<T>,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(tree: &'a LabelTree<T>, index: Index) -> Option<Self> {
        tree.get_node(index).map(|node| Self { tree, index, node })
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn id(&self) -> Uuid {
        self.node.id()
    }

    pub fn label(&self) -> &'a str {
        self.node.label()
    }

    pub fn data(&self) -> Option<&'a T> {
        self.node.data()
    }

    pub fn tree(&self) -> &'a LabelTree<T> {
        self.tree
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.node.parent().and_then(|p| NodeRef::new(self.tree, p))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a {
        let tree = self.tree;
        self.node
            .children()
            .iter()
            .filter_map(move |&c| NodeRef::new(tree, c))
    }

    pub fn child_count(&self) -> usize {
        self.node.children().len()
    }

    pub fn find_children_matching<P>(&self, predicate: P, max_matches: usize) -> Vec<NodeRef<'a, T>>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        self.tree
            .find_children_matching(self.index, predicate, max_matches)
            .into_iter()
            .filter_map(|c| NodeRef::new(self.tree, c))
            .collect()
    }

    pub fn find_child_matching<P>(&self, predicate: P) -> Option<NodeRef<'a, T>>
    where
        P: FnMut(&TreeNode<T>) -> bool,
    {
        let idx = self.tree.find_child_matching(self.index, predicate)?;
        NodeRef::new(self.tree, idx)
    }

    pub fn find_child_by_label(&self, label: &str) -> Option<NodeRef<'a, T>> {
        let idx = self.tree.find_child_by_label(self.index, label)?;
        NodeRef::new(self.tree, idx)
    }

    pub fn find_child_by_id(&self, id: Uuid) -> Option<NodeRef<'a, T>> {
        let idx = self.tree.find_child_by_id(self.index, id)?;
        NodeRef::new(self.tree, idx)
    }

    pub fn resolve_path(&self, path: &str) -> Option<NodeRef<'a, T>> {
        let idx = self.tree.resolve_path_from(self.index, path)?;
        NodeRef::new(self.tree, idx)
    }

    pub fn resolve_path_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Option<NodeRef<'a, T>> {
        let idx = self.tree.resolve_path_tokens(self.index, tokens)?;
        NodeRef::new(self.tree, idx)
    }

    /// Path from the root, `None` when detached.
    pub fn path(&self) -> Option<String> {
        self.tree.path_of(self.index)
    }
}

/// Mutable cursor on a live node.
#[derive(Debug)]
pub struct NodeMut<'a, T> {
    tree: &'a mut LabelTree<T>,
    index: Index,
}

impl<'a, T> NodeMut<'a, T> {
    pub(crate) fn new(tree: &'a mut LabelTree<T>, index: Index) -> Option<Self> {
        if tree.contains(index) {
            Some(Self { tree, index })
        } else {
            None
        }
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn view(&self) -> Option<NodeRef<'_, T>> {
        NodeRef::new(self.tree, self.index)
    }

    pub fn into_ref(self) -> Option<NodeRef<'a, T>> {
        let tree: &'a LabelTree<T> = self.tree;
        NodeRef::new(tree, self.index)
    }

    pub fn label(&self) -> &str {
        self.tree
            .get_node(self.index)
            .map(|n| n.label())
            .unwrap_or_default()
    }

    pub fn data(&self) -> Option<&T> {
        self.tree.get_node(self.index).and_then(|n| n.data())
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.tree
            .get_node_mut(self.index)
            .and_then(|n| n.data_mut())
    }

    pub fn set_data(&mut self, data: Option<T>) -> Option<T> {
        self.tree
            .get_node_mut(self.index)
            .and_then(|n| n.set_data(data))
    }

    /// Create a child and move the cursor onto it, so calls chain downwards.
    pub fn create_child(self, id: Uuid, label: &str, data: Option<T>) -> TreeResult<NodeMut<'a, T>> {
        let child = self.tree.create_child(self.index, id, label, data)?;
        NodeMut::new(self.tree, child).ok_or(TreeError::NodeNotFound(child))
    }

    /// Attach detached nodes below this one; the cursor stays here.
    pub fn attach_children(self, nodes: impl IntoIterator<Item = Index>) -> TreeResult<Self> {
        self.tree.attach_children(self.index, nodes)?;
        Ok(self)
    }

    pub fn insert_at_path<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        nodes: impl IntoIterator<Item = Index>,
    ) -> TreeResult<Index> {
        self.tree.insert_at_path(self.index, segments, nodes)
    }

    /// Make a detached node in the same tree, ready to be attached.
    pub fn new_detached_node(&mut self, id: Uuid, label: &str, data: Option<T>) -> Index {
        self.tree.new_detached_node(id, label, data)
    }

    pub fn next_id(&mut self) -> Uuid {
        self.tree.next_id()
    }

    /// Remove this node and its subtree from the tree.
    pub fn destroy(self) -> bool {
        self.tree.destroy(self.index)
    }
}

impl<T> LabelTree<T> {
    pub fn node(&self, idx: Index) -> Option<NodeRef<'_, T>> {
        NodeRef::new(self, idx)
    }

    pub fn node_mut(&mut self, idx: Index) -> Option<NodeMut<'_, T>> {
        NodeMut::new(self, idx)
    }

    pub fn root_ref(&self) -> NodeRef<'_, T> {
        let root = self.root();
        NodeRef {
            tree: self,
            index: root,
            node: self.root_node(),
        }
    }

    pub fn root_mut(&mut self) -> NodeMut<'_, T> {
        let index = self.root();
        NodeMut { tree: self, index }
    }
}
