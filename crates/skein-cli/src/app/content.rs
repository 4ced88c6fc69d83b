//! Content view: one torrent's file tree with a row cursor.

use skein_content::{ContentTree, NodeId, PriorityStep, Row, SelectionChange};
use skein_torrent_core::{ContentListing, TorrentId};

#[derive(Debug)]
pub(crate) struct ContentView {
    pub(crate) torrent: TorrentId,
    pub(crate) name: String,
    pub(crate) base_path: String,
    pub(crate) tree: ContentTree,
    rows: Vec<Row>,
    cursor: usize,
}

impl ContentView {
    pub(crate) fn new(torrent: TorrentId, name: String, listing: ContentListing) -> Self {
        let tree = ContentTree::build(listing.leaves);
        let rows = tree.rows();
        Self {
            torrent,
            name,
            base_path: listing.base_path,
            tree,
            rows,
            cursor: 0,
        }
    }

    /// Pre-order rows. Edits never change the shape of the tree, so these are
    /// computed once.
    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) const fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn current(&self) -> Option<NodeId> {
        self.rows.get(self.cursor).map(|row| row.id)
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.rows.len() - 1);
    }

    /// Jump to the next directory row below the cursor, or the next top-level
    /// directory. The cursor stays put when there is none.
    pub(crate) fn next_directory(&mut self, top_level: bool) {
        let found = self
            .rows
            .iter()
            .enumerate()
            .skip(self.cursor + 1)
            .find(|(_, row)| {
                self.tree[row.id].is_directory() && (!top_level || row.depth == 1)
            })
            .map(|(index, _)| index);
        if let Some(index) = found {
            self.cursor = index;
        }
    }

    pub(crate) fn toggle_current(&mut self) -> Option<SelectionChange> {
        let id = self.current()?;
        self.tree.toggle_wanted(id)
    }

    pub(crate) fn cycle_current(&mut self, step: PriorityStep) -> Option<SelectionChange> {
        let id = self.current()?;
        self.tree.cycle_priority(id, step)
    }
}
