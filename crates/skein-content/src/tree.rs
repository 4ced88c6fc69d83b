//! Arena-backed content tree and its read accessors.

use std::ops::Index;

use skein_torrent_core::{LeafId, LeafRecord};

use crate::state::{PriorityState, WantedState};
use crate::{aggregate, build, resolve};

/// Handle to a node of one [`ContentTree`].
///
/// Handles are plain indices into the tree's arena; they stay valid for the
/// lifetime of the tree they came from and mean nothing to any other tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Directory or leaf payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Synthetic grouping node owning its children in discovery order.
    Directory {
        /// Child handles in first-discovered order.
        children: Vec<NodeId>,
    },
    /// One file.
    Leaf {
        /// The record this leaf was built from.
        record: LeafRecord,
    },
}

/// One node of the content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) path: Vec<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) size: u64,
    pub(crate) completed: u64,
    pub(crate) progress: f64,
    pub(crate) wanted: WantedState,
    pub(crate) priority: PriorityState,
}

impl Node {
    pub(crate) fn directory(name: String, path: Vec<String>, parent: Option<NodeId>) -> Self {
        Self {
            name,
            path,
            parent,
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
            size: 0,
            completed: 0,
            progress: 0.0,
            wanted: WantedState::Wanted,
            priority: PriorityState::Normal,
        }
    }

    pub(crate) fn leaf(record: LeafRecord, parent: NodeId) -> Self {
        Self {
            name: record.file_name().to_string(),
            path: record.path.clone(),
            parent: Some(parent),
            size: record.size,
            completed: record.completed,
            progress: record.progress(),
            wanted: WantedState::from_flag(record.wanted),
            priority: PriorityState::from(record.priority),
            kind: NodeKind::Leaf { record },
        }
    }

    /// Last path segment; empty for the synthetic root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segments from the root down to this node.
    #[must_use]
    pub fn full_path(&self) -> &[String] {
        &self.path
    }

    /// Depth below the root (the root itself is depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Parent handle; `None` only for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Directory or leaf payload.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether this is a synthetic directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Children in display order; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Source record for leaves.
    #[must_use]
    pub const fn record(&self) -> Option<&LeafRecord> {
        match &self.kind {
            NodeKind::Leaf { record } => Some(record),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Daemon file id for leaves.
    #[must_use]
    pub const fn leaf_id(&self) -> Option<LeafId> {
        match &self.kind {
            NodeKind::Leaf { record } => Some(record.id),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Bytes of every file at or below this node.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Downloaded bytes of every file at or below this node.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    /// Size-weighted completed fraction in `[0, 1]`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Wanted state; definite for leaves.
    #[must_use]
    pub const fn wanted_state(&self) -> WantedState {
        self.wanted
    }

    /// Priority state; definite for leaves.
    #[must_use]
    pub const fn priority_state(&self) -> PriorityState {
        self.priority
    }
}

/// A node together with its display depth, as produced by [`ContentTree::rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Node handle.
    pub id: NodeId,
    /// Depth below the root, starting at 1 for top-level entries.
    pub depth: usize,
}

/// Directory tree of one torrent's files.
///
/// Node 0 is always the synthetic root. Every other node is stored after its
/// parent, so a reverse scan of the arena visits children before parents.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTree {
    pub(crate) nodes: Vec<Node>,
}

impl ContentTree {
    pub(crate) const ROOT: NodeId = NodeId(0);

    /// Build a fully aggregated and resolved tree from a flat file listing.
    ///
    /// The order of `leaves` does not matter.
    #[must_use]
    pub fn build(leaves: Vec<LeafRecord>) -> Self {
        let mut nodes = build::build_nodes(leaves);
        aggregate::aggregate(&mut nodes);
        resolve::resolve(&mut nodes);
        Self { nodes }
    }

    /// Handle of the synthetic root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Node behind `id`, if it belongs to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Every node handle in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Source records of every leaf, in tree order.
    pub fn leaves(&self) -> impl Iterator<Item = &LeafRecord> + '_ {
        self.nodes.iter().filter_map(Node::record)
    }

    /// `id` followed by all of its descendants in pre-order.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.get(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self[current].children().iter().rev().copied());
        }
        out
    }

    /// Strict ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.get(id).and_then(Node::parent);
        std::iter::from_fn(move || {
            let current = next?;
            next = self[current].parent;
            Some(current)
        })
    }

    /// Every node except the root in pre-order, with its depth.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<Row> = self[Self::ROOT]
            .children()
            .iter()
            .rev()
            .map(|&id| Row { id, depth: 1 })
            .collect();
        while let Some(row) = stack.pop() {
            rows.push(row);
            stack.extend(self[row.id].children().iter().rev().map(|&id| Row {
                id,
                depth: row.depth + 1,
            }));
        }
        rows
    }

    /// First node whose full path equals `path`.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<NodeId> {
        let mut current = Self::ROOT;
        for segment in path {
            current = self[current]
                .children()
                .iter()
                .copied()
                .find(|child| self[*child].name == *segment)?;
        }
        Some(current)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

impl Index<NodeId> for ContentTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_torrent_core::FilePriority;

    fn record(id: u32, path: &str) -> LeafRecord {
        LeafRecord::new(LeafId(id), path, 10, 5, FilePriority::Normal, true)
    }

    #[test]
    fn empty_tree_has_only_root() {
        let tree = ContentTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.rows().is_empty());
        let root = &tree[tree.root()];
        assert!(root.is_directory());
        assert_eq!(root.size(), 0);
        assert!(root.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn accessors_expose_names_paths_and_ancestors() {
        let tree = ContentTree::build(vec![record(0, "a/b/c.txt"), record(1, "a/d.txt")]);
        let leaf = tree.find(&["a", "b", "c.txt"]).expect("leaf exists");
        let node = &tree[leaf];
        assert_eq!(node.name(), "c.txt");
        assert_eq!(node.full_path(), ["a", "b", "c.txt"]);
        assert_eq!(node.depth(), 3);
        assert_eq!(node.leaf_id(), Some(LeafId(0)));

        let names: Vec<&str> = tree.ancestors(leaf).map(|id| tree[id].name()).collect();
        assert_eq!(names, vec!["b", "a", ""]);
        assert!(tree.find(&["a", "missing"]).is_none());
    }

    #[test]
    fn rows_are_pre_order_with_depth() {
        let tree = ContentTree::build(vec![
            record(0, "a/b/c.txt"),
            record(1, "a/d.txt"),
            record(2, "top.txt"),
        ]);
        let rendered: Vec<(String, usize)> = tree
            .rows()
            .into_iter()
            .map(|row| (tree[row.id].name().to_string(), row.depth))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("c.txt".to_string(), 3),
                ("d.txt".to_string(), 2),
                ("top.txt".to_string(), 1),
            ]
        );
    }

    #[test]
    fn subtree_of_foreign_id_is_empty() {
        let tree = ContentTree::build(vec![record(0, "x")]);
        assert!(tree.subtree(NodeId(99)).is_empty());
        assert_eq!(tree.ancestors(NodeId(99)).count(), 0);
    }
}
