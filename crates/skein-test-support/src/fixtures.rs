//! Builders for leaf records and torrent summaries.

use skein_torrent_core::{
    FilePriority, LeafId, LeafRecord, TorrentId, TorrentStatusKind, TorrentSummary,
};

/// Wanted leaf at normal priority.
#[must_use]
pub fn leaf(id: u32, path: &str, size: u64, completed: u64) -> LeafRecord {
    LeafRecord::new(LeafId(id), path, size, completed, FilePriority::Normal, true)
}

/// Leaf with explicit priority and wanted flag.
#[must_use]
pub fn leaf_with(
    id: u32,
    path: &str,
    size: u64,
    completed: u64,
    priority: FilePriority,
    wanted: bool,
) -> LeafRecord {
    LeafRecord::new(LeafId(id), path, size, completed, priority, wanted)
}

/// The three-file listing used throughout the content-tree suites:
///
/// ```text
/// a/b/file1.txt  100 bytes, complete, wanted
/// a/b/file2.txt  200 bytes, empty,    unwanted
/// a/c.txt         50 bytes, half,     wanted
/// ```
#[must_use]
pub fn sample_leaves() -> Vec<LeafRecord> {
    vec![
        leaf(0, "a/b/file1.txt", 100, 100),
        leaf_with(1, "a/b/file2.txt", 200, 0, FilePriority::Normal, false),
        leaf(2, "a/c.txt", 50, 25),
    ]
}

/// Minimal torrent summary; callers override fields with struct update syntax.
#[must_use]
pub fn summary(id: i64, name: &str) -> TorrentSummary {
    TorrentSummary {
        id: TorrentId(id),
        name: name.to_string(),
        added_at: 1_700_000_000 + id,
        status: TorrentStatusKind::Downloading,
        size_when_done: 1_000,
        ..TorrentSummary::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_leaves_match_the_documented_listing() {
        let leaves = sample_leaves();
        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[1].joined_path(), "a/b/file2.txt");
        assert!(!leaves[1].wanted);
        assert_eq!(leaves[2].completed, 25);
    }

    #[test]
    fn summary_sets_identity_and_status() {
        let torrent = summary(7, "ubuntu.iso");
        assert_eq!(torrent.id, TorrentId(7));
        assert_eq!(torrent.status, TorrentStatusKind::Downloading);
        assert!(!torrent.has_error());
    }
}
