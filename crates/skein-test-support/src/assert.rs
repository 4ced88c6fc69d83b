//! Structural and derived-state checks for content trees.

use skein_content::{ContentTree, Node, NodeId, PriorityState, WantedState};
use skein_torrent_core::LeafRecord;

/// Panic with a descriptive message unless every content-tree invariant holds.
///
/// Checked for every node: the parent link is consistent with the child list,
/// leaves carry definite states, directories carry the size and completed sums
/// of their leaves, progress equals the completed fraction, and directory
/// tri-states are derived from the leaves below them.
///
/// # Panics
///
/// Panics on the first violated invariant.
pub fn assert_tree_invariants(tree: &ContentTree) {
    for id in tree.ids() {
        let node = &tree[id];
        for &child in node.children() {
            assert_eq!(
                tree[child].parent(),
                Some(id),
                "child {child:?} does not point back to {id:?}"
            );
        }

        let leaves = leaves_below(tree, id);
        if let Some(record) = node.record() {
            assert!(
                node.wanted_state().as_flag().is_some(),
                "leaf {id:?} has mixed wanted state"
            );
            assert!(
                node.priority_state().definite().is_some(),
                "leaf {id:?} has mixed priority"
            );
            assert_eq!(node.size(), record.size, "leaf {id:?} size");
            continue;
        }

        let size: u64 = leaves.iter().map(|leaf| leaf.size).sum();
        let completed: u64 = leaves.iter().map(|leaf| leaf.completed).sum();
        assert_eq!(node.size(), size, "directory {id:?} size");
        assert_eq!(node.completed(), completed, "directory {id:?} completed");
        assert_progress(tree, id, completed, size);

        if leaves.is_empty() {
            continue;
        }
        let wanted: Vec<WantedState> = states_below(tree, id, |n| n.wanted_state());
        let expected_wanted = if wanted.iter().all(|s| *s == WantedState::Wanted) {
            WantedState::Wanted
        } else if wanted.iter().all(|s| *s == WantedState::Unwanted) {
            WantedState::Unwanted
        } else {
            WantedState::Mixed
        };
        assert_eq!(node.wanted_state(), expected_wanted, "directory {id:?} wanted");

        let priorities: Vec<PriorityState> = states_below(tree, id, |n| n.priority_state());
        let expected_priority = if priorities.windows(2).all(|pair| pair[0] == pair[1]) {
            priorities[0]
        } else {
            PriorityState::Mixed
        };
        assert_eq!(
            node.priority_state(),
            expected_priority,
            "directory {id:?} priority"
        );
    }
}

/// Source records of every leaf at or below `id`.
#[must_use]
pub fn leaves_below(tree: &ContentTree, id: NodeId) -> Vec<&LeafRecord> {
    tree.subtree(id)
        .into_iter()
        .filter_map(|member| tree[member].record())
        .collect()
}

fn states_below<T>(
    tree: &ContentTree,
    id: NodeId,
    read: impl Fn(&Node) -> T,
) -> Vec<T> {
    tree.subtree(id)
        .into_iter()
        .filter(|member| !tree[*member].is_directory())
        .map(|member| read(&tree[member]))
        .collect()
}

fn assert_progress(tree: &ContentTree, id: NodeId, completed: u64, size: u64) {
    let progress = tree[id].progress();
    if size == 0 {
        assert!(progress.abs() < f64::EPSILON, "empty {id:?} has progress");
    } else {
        let expected = skein_torrent_core::fraction(completed, size);
        assert!(
            (progress - expected).abs() < 1e-9,
            "directory {id:?} progress {progress} != {expected}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_leaves;

    #[test]
    fn sample_tree_satisfies_invariants() {
        assert_tree_invariants(&ContentTree::build(sample_leaves()));
    }

    #[test]
    fn empty_tree_satisfies_invariants() {
        assert_tree_invariants(&ContentTree::build(Vec::new()));
    }

    #[test]
    fn leaves_below_root_cover_every_record() {
        let tree = ContentTree::build(sample_leaves());
        assert_eq!(leaves_below(&tree, tree.root()).len(), 3);
    }
}
