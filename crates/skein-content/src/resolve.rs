//! Derivation of directory tri-states from their children.

use crate::state::{PriorityState, WantedState};
use crate::tree::{Node, NodeId};

/// Derive wanted and priority state for every directory, children first.
pub(crate) fn resolve(nodes: &mut [Node]) {
    for index in (0..nodes.len()).rev() {
        rederive(nodes, NodeId(index));
    }
}

/// Recompute one directory's states from its direct children.
///
/// Leaves are left untouched. Children are assumed to be up to date already.
/// A directory without children (only the root of an empty tree) reads as
/// wanted at normal priority.
pub(crate) fn rederive(nodes: &mut [Node], id: NodeId) {
    let node = &nodes[id.0];
    if !node.is_directory() {
        return;
    }
    let mut children = node.children().iter().map(|child| &nodes[child.0]);
    let (wanted, priority) = match children.next() {
        None => (WantedState::Wanted, PriorityState::Normal),
        Some(first) => children.fold((first.wanted, first.priority), |(w, p), child| {
            (w.merge(child.wanted), p.merge(child.priority))
        }),
    };
    let node = &mut nodes[id.0];
    node.wanted = wanted;
    node.priority = priority;
}
