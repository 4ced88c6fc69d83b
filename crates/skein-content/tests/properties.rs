//! Randomised checks of the content-tree invariants under builds and edits.

use std::collections::BTreeSet;

use proptest::prelude::*;
use skein_content::{
    ContentTree, FilePriority, LeafId, LeafRecord, NodeId, PriorityState, PriorityStep,
    SelectionChange, WantedState,
};
use skein_test_support::assert::{assert_tree_invariants, leaves_below};

fn leaf_strategy() -> impl Strategy<Value = (String, u64, u64, i64, bool)> {
    (
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d.bin"]), 1..5),
        0u64..10_000,
        0u64..10_000,
        -1i64..=1,
        any::<bool>(),
    )
        .prop_map(|(segments, size, completed, level, wanted)| {
            (segments.join("/"), size, completed, level, wanted)
        })
}

fn listing() -> impl Strategy<Value = Vec<LeafRecord>> {
    prop::collection::vec(leaf_strategy(), 0..24).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(index, (path, size, completed, level, wanted))| {
                let id = u32::try_from(index).unwrap_or(u32::MAX);
                LeafRecord::new(
                    LeafId(id),
                    &path,
                    size,
                    completed,
                    FilePriority::from_level(level),
                    wanted,
                )
            })
            .collect()
    })
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Toggle(usize),
    Raise(usize),
    Lower(usize),
}

fn edits() -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(
        prop_oneof![
            any::<usize>().prop_map(Edit::Toggle),
            any::<usize>().prop_map(Edit::Raise),
            any::<usize>().prop_map(Edit::Lower),
        ],
        0..16,
    )
}

fn pick(tree: &ContentTree, raw: usize) -> NodeId {
    let ids: Vec<NodeId> = tree.ids().collect();
    ids[raw % ids.len()]
}

fn leaf_states(tree: &ContentTree) -> Vec<(LeafId, WantedState, PriorityState)> {
    tree.ids()
        .filter_map(|id| {
            let node = &tree[id];
            node.leaf_id()
                .map(|leaf| (leaf, node.wanted_state(), node.priority_state()))
        })
        .collect()
}

fn triples(leaves: impl IntoIterator<Item = LeafRecord>) -> Vec<(String, u64, u64)> {
    let mut out: Vec<_> = leaves
        .into_iter()
        .map(|leaf| (leaf.joined_path(), leaf.size, leaf.completed))
        .collect();
    out.sort();
    out
}

proptest! {
    #[test]
    fn built_trees_satisfy_every_invariant(leaves in listing()) {
        let tree = ContentTree::build(leaves.clone());
        assert_tree_invariants(&tree);
        let total: u64 = leaves.iter().map(|leaf| leaf.size).sum();
        prop_assert_eq!(tree[tree.root()].size(), total);
    }

    #[test]
    fn flattening_reproduces_the_input_multiset(leaves in listing()) {
        let tree = ContentTree::build(leaves.clone());
        prop_assert_eq!(triples(tree.leaves().cloned()), triples(leaves));
    }

    #[test]
    fn edit_sequences_preserve_invariants(leaves in listing(), script in edits()) {
        let mut tree = ContentTree::build(leaves);
        for edit in script {
            match edit {
                Edit::Toggle(raw) => {
                    let id = pick(&tree, raw);
                    tree.toggle_wanted(id);
                }
                Edit::Raise(raw) => {
                    let id = pick(&tree, raw);
                    tree.cycle_priority(id, PriorityStep::Raise);
                }
                Edit::Lower(raw) => {
                    let id = pick(&tree, raw);
                    tree.cycle_priority(id, PriorityStep::Lower);
                }
            }
            assert_tree_invariants(&tree);
        }
    }

    #[test]
    fn toggle_makes_the_subtree_uniform(leaves in listing(), raw in any::<usize>()) {
        let mut tree = ContentTree::build(leaves);
        let id = pick(&tree, raw);
        if leaves_below(&tree, id).is_empty() {
            return Ok(());
        }
        let target = tree[id].wanted_state().toggled();
        tree.toggle_wanted(id);
        prop_assert_eq!(tree[id].wanted_state(), target);
        for member in tree.subtree(id) {
            prop_assert_eq!(tree[member].wanted_state(), target);
        }
    }

    #[test]
    fn reported_leaves_are_exactly_the_changed_ones(
        leaves in listing(),
        raw in any::<usize>(),
        raise in any::<bool>(),
        toggle in any::<bool>(),
    ) {
        let mut tree = ContentTree::build(leaves);
        let id = pick(&tree, raw);
        let before = leaf_states(&tree);
        let change = if toggle {
            tree.toggle_wanted(id)
        } else {
            let step = if raise { PriorityStep::Raise } else { PriorityStep::Lower };
            tree.cycle_priority(id, step)
        };
        let after = leaf_states(&tree);
        let moved: BTreeSet<LeafId> = before
            .iter()
            .zip(&after)
            .filter(|(old, new)| old != new)
            .map(|(old, _)| old.0)
            .collect();
        let reported: BTreeSet<LeafId> = change
            .as_ref()
            .map(|change| change.leaves().iter().copied().collect())
            .unwrap_or_default();
        prop_assert_eq!(&reported, &moved);
        if let Some(SelectionChange::Wanted { wanted, .. }) = change {
            for (leaf, state, _) in &after {
                if moved.contains(leaf) {
                    prop_assert_eq!(state.as_flag(), Some(wanted));
                }
            }
        }
    }

    #[test]
    fn saturated_steps_never_change_anything(leaves in listing(), raw in any::<usize>()) {
        let mut tree = ContentTree::build(leaves);
        let id = pick(&tree, raw);
        while tree.cycle_priority(id, PriorityStep::Raise).is_some() {}
        let snapshot = tree.clone();
        for _ in 0..3 {
            prop_assert!(tree.cycle_priority(id, PriorityStep::Raise).is_none());
        }
        prop_assert_eq!(&tree, &snapshot);
    }

    #[test]
    fn saturated_lower_steps_never_change_anything(leaves in listing(), raw in any::<usize>()) {
        let mut tree = ContentTree::build(leaves);
        let id = pick(&tree, raw);
        while tree.cycle_priority(id, PriorityStep::Lower).is_some() {}
        if !leaves_below(&tree, id).is_empty() {
            prop_assert_eq!(tree[id].priority_state(), PriorityState::Low);
        }
        let snapshot = tree.clone();
        for _ in 0..3 {
            prop_assert!(tree.cycle_priority(id, PriorityStep::Lower).is_none());
        }
        prop_assert_eq!(&tree, &snapshot);
    }
}
