#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Content-tree engine for a single torrent's file listing.
//!
//! A flat list of [`LeafRecord`]s becomes a [`ContentTree`]: synthetic
//! directories group shared path prefixes, every node carries rolled-up size and
//! progress, and two tri-state attributes (wanted, priority) are derived from the
//! leaves upward. Edits go through [`ContentTree::toggle_wanted`] and
//! [`ContentTree::cycle_priority`], which push the new value down the subtree,
//! re-derive every ancestor, and hand back the [`SelectionChange`] the daemon
//! has to be told about.
//!
//! Layout: `state.rs` (tri-state values and the priority transition table),
//! `tree.rs` (arena, node accessors, traversal), `build.rs` (prefix merging),
//! `aggregate.rs` (size/progress rollup), `resolve.rs` (state derivation),
//! `propagate.rs` (user edits).

mod aggregate;
mod build;
mod propagate;
mod resolve;
mod state;
mod tree;

pub use propagate::SelectionChange;
pub use skein_torrent_core::{FilePriority, LeafId, LeafRecord};
pub use state::{PriorityState, PriorityStep, WantedState};
pub use tree::{ContentTree, Node, NodeId, NodeKind, Row};
