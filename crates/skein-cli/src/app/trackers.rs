//! Trackers view: announce URLs of one torrent with a row cursor.

use skein_torrent_core::{TorrentId, TrackerInfo};

#[derive(Debug)]
pub(crate) struct TrackersView {
    pub(crate) torrent: TorrentId,
    pub(crate) name: String,
    trackers: Vec<TrackerInfo>,
    cursor: usize,
}

impl TrackersView {
    pub(crate) fn new(torrent: TorrentId, name: String, trackers: Vec<TrackerInfo>) -> Self {
        Self {
            torrent,
            name,
            trackers,
            cursor: 0,
        }
    }

    pub(crate) fn trackers(&self) -> &[TrackerInfo] {
        &self.trackers
    }

    pub(crate) const fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn current(&self) -> Option<&TrackerInfo> {
        self.trackers.get(self.cursor)
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        if self.trackers.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.trackers.len() - 1);
    }

    /// Swap in a fresh listing; the cursor stays on the same row index.
    pub(crate) fn replace(&mut self, trackers: Vec<TrackerInfo>) {
        self.trackers = trackers;
        self.move_cursor(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(id: i64) -> TrackerInfo {
        TrackerInfo {
            id,
            announce: format!("udp://t{id}.example:6969"),
            ..TrackerInfo::default()
        }
    }

    #[test]
    fn cursor_clamps_after_a_shorter_listing() {
        let mut view = TrackersView::new(
            TorrentId(1),
            "one".into(),
            vec![tracker(0), tracker(1), tracker(2)],
        );
        view.move_cursor(isize::MAX);
        assert_eq!(view.current().map(|t| t.id), Some(2));
        view.replace(vec![tracker(0)]);
        assert_eq!(view.cursor(), 0);
        view.replace(Vec::new());
        assert!(view.current().is_none());
    }
}
