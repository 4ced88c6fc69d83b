//! Inspector and workflow traits implemented by daemon adapters.

use async_trait::async_trait;

use crate::error::{TorrentError, TorrentResult};
use crate::model::{
    AddTorrent, ContentListing, FilePriority, LeafId, PeerInfo, SessionStats, TorrentAction,
    TorrentDetails, TorrentId, TorrentSummary, TrackerInfo,
};

/// Read-only view of the daemon's torrents.
#[async_trait]
pub trait TorrentInspector: Send + Sync {
    /// Aggregate transfer statistics for the whole session.
    async fn session_stats(&self) -> TorrentResult<SessionStats>;

    /// Every torrent known to the daemon, in daemon-native order.
    async fn list(&self) -> TorrentResult<Vec<TorrentSummary>>;

    /// Flat file listing of one torrent.
    async fn content(&self, id: TorrentId) -> TorrentResult<ContentListing>;

    /// Connected peers; default implementation reports lack of support.
    async fn peers(&self, id: TorrentId) -> TorrentResult<Vec<PeerInfo>> {
        let _ = id;
        Err(TorrentError::Unsupported {
            operation: "torrent.peers",
        })
    }

    /// Trackers of one torrent with their announce statistics.
    async fn trackers(&self, id: TorrentId) -> TorrentResult<Vec<TrackerInfo>> {
        let _ = id;
        Err(TorrentError::Unsupported {
            operation: "torrent.trackers",
        })
    }

    /// Descriptive details of one torrent.
    async fn details(&self, id: TorrentId) -> TorrentResult<TorrentDetails> {
        let _ = id;
        Err(TorrentError::Unsupported {
            operation: "torrent.details",
        })
    }

    /// Bytes available in `path` on the daemon host.
    async fn free_space(&self, path: &str) -> TorrentResult<u64> {
        let _ = path;
        Err(TorrentError::Unsupported {
            operation: "session.free_space",
        })
    }
}

/// Mutating commands sent to the daemon.
#[async_trait]
pub trait TorrentWorkflow: Send + Sync {
    /// Add a torrent; returns the daemon-assigned id when the daemon reports one.
    async fn add_torrent(&self, request: AddTorrent) -> TorrentResult<Option<TorrentId>>;

    /// Apply a lifecycle action to every torrent in `ids`.
    async fn perform(&self, ids: &[TorrentId], action: TorrentAction) -> TorrentResult<()>;

    /// Mark the given files wanted or unwanted.
    async fn set_files_wanted(
        &self,
        id: TorrentId,
        files: &[LeafId],
        wanted: bool,
    ) -> TorrentResult<()>;

    /// Set the download priority of the given files.
    async fn set_files_priority(
        &self,
        id: TorrentId,
        files: &[LeafId],
        priority: FilePriority,
    ) -> TorrentResult<()>;

    /// Replace the labels of every torrent in `ids`; an empty list clears them.
    async fn set_labels(&self, ids: &[TorrentId], labels: &[String]) -> TorrentResult<()>;

    /// Point every torrent in `ids` at `location`, moving existing data when
    /// `move_data` is set.
    async fn set_location(
        &self,
        ids: &[TorrentId],
        location: &str,
        move_data: bool,
    ) -> TorrentResult<()>;

    /// Rename the file or directory at `path` (relative to the torrent root)
    /// to `name`.
    async fn rename_path(&self, id: TorrentId, path: &str, name: &str) -> TorrentResult<()>;

    /// Append an announce URL to the torrent's tracker list.
    async fn add_tracker(&self, id: TorrentId, announce: &str) -> TorrentResult<()>;

    /// Replace the announce URL of tracker `tracker_id`.
    async fn replace_tracker(
        &self,
        id: TorrentId,
        tracker_id: i64,
        announce: &str,
    ) -> TorrentResult<()>;

    /// Drop tracker `tracker_id` from the torrent.
    async fn remove_tracker(&self, id: TorrentId, tracker_id: i64) -> TorrentResult<()>;
}

/// Full daemon surface consumed by the client.
pub trait DaemonClient: TorrentInspector + TorrentWorkflow {}

impl<T> DaemonClient for T where T: TorrentInspector + TorrentWorkflow + ?Sized {}

#[cfg(test)]
mod tests {
    use super::*;

    struct ListOnly;

    #[async_trait]
    impl TorrentInspector for ListOnly {
        async fn session_stats(&self) -> TorrentResult<SessionStats> {
            Ok(SessionStats::default())
        }

        async fn list(&self) -> TorrentResult<Vec<TorrentSummary>> {
            Ok(Vec::new())
        }

        async fn content(&self, id: TorrentId) -> TorrentResult<ContentListing> {
            Err(TorrentError::NotFound { torrent_id: id })
        }
    }

    #[tokio::test]
    async fn optional_reads_default_to_unsupported() {
        let inspector = ListOnly;
        let trackers = inspector.trackers(TorrentId(1)).await.expect_err("trackers");
        assert_eq!(trackers.operation(), Some("torrent.trackers"));
        let details = inspector.details(TorrentId(1)).await.expect_err("details");
        assert_eq!(details.operation(), Some("torrent.details"));
        let space = inspector.free_space("/srv").await.expect_err("free space");
        assert_eq!(space.operation(), Some("session.free_space"));
    }

    #[tokio::test]
    async fn peers_default_reports_unsupported() {
        let inspector = ListOnly;
        let err = inspector
            .peers(TorrentId(1))
            .await
            .expect_err("default peers should fail");
        assert!(matches!(
            err,
            TorrentError::Unsupported {
                operation: "torrent.peers"
            }
        ));
    }
}
