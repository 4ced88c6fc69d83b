//! User edits: push a value down a subtree and re-derive the path to the root.

use serde::{Deserialize, Serialize};
use skein_torrent_core::{FilePriority, LeafId};
use tracing::debug;

use crate::resolve::rederive;
use crate::state::{PriorityState, PriorityStep};
use crate::tree::{ContentTree, Node, NodeId};

/// Outbound command produced by one edit.
///
/// `leaves` holds exactly the files whose state changed, sorted by id. An edit
/// that changes nothing produces no `SelectionChange` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionChange {
    /// Mark `leaves` wanted or unwanted.
    Wanted {
        /// Affected files.
        leaves: Vec<LeafId>,
        /// New wanted flag.
        wanted: bool,
    },
    /// Move `leaves` to `priority`.
    Priority {
        /// Affected files.
        leaves: Vec<LeafId>,
        /// New priority.
        priority: FilePriority,
    },
}

impl SelectionChange {
    /// Files the daemon has to be told about.
    #[must_use]
    pub fn leaves(&self) -> &[LeafId] {
        match self {
            Self::Wanted { leaves, .. } | Self::Priority { leaves, .. } => leaves,
        }
    }
}

impl ContentTree {
    /// Toggle the wanted state of `id` and everything below it.
    ///
    /// A fully wanted node becomes unwanted; an unwanted or mixed node becomes
    /// wanted. Returns `None` when `id` is not part of this tree or the subtree
    /// holds no files.
    pub fn toggle_wanted(&mut self, id: NodeId) -> Option<SelectionChange> {
        let target = self.get(id)?.wanted_state().toggled();
        let wanted = target.as_flag()?;
        let leaves = self.push_down(id, |node| {
            let changed = node.wanted != target;
            node.wanted = target;
            changed
        });
        self.rederive_upward(id);
        debug!(node = id.index(), wanted, changed = leaves.len(), "toggled wanted");
        (!leaves.is_empty()).then_some(SelectionChange::Wanted { leaves, wanted })
    }

    /// Raise or lower the priority of `id` and everything below it.
    ///
    /// Saturates at both ends; a mixed node steps as if it were low. Returns
    /// `None` for a saturated step, an id outside this tree, or a subtree with
    /// no files.
    pub fn cycle_priority(&mut self, id: NodeId, step: PriorityStep) -> Option<SelectionChange> {
        let priority = self.get(id)?.priority_state().step(step)?;
        let target = PriorityState::from(priority);
        let leaves = self.push_down(id, |node| {
            let changed = node.priority != target;
            node.priority = target;
            changed
        });
        self.rederive_upward(id);
        debug!(
            node = id.index(),
            priority = priority.as_str(),
            changed = leaves.len(),
            "cycled priority"
        );
        (!leaves.is_empty()).then_some(SelectionChange::Priority { leaves, priority })
    }

    /// Apply `set` to every node of the subtree; collect the leaves it changed.
    fn push_down(&mut self, id: NodeId, mut set: impl FnMut(&mut Node) -> bool) -> Vec<LeafId> {
        let mut changed = Vec::new();
        for member in self.subtree(id) {
            let node = self.node_mut(member);
            if set(node) {
                if let Some(leaf) = node.leaf_id() {
                    changed.push(leaf);
                }
            }
        }
        changed.sort_unstable();
        changed
    }

    /// Re-derive `id` (when it is a directory) and then each of its ancestors.
    fn rederive_upward(&mut self, id: NodeId) {
        let path: Vec<NodeId> = std::iter::once(id).chain(self.ancestors(id)).collect();
        for member in path {
            rederive(&mut self.nodes, member);
        }
    }
}
