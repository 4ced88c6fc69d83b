//! In-memory daemon that records every call made against it.

use std::collections::HashMap;

use async_trait::async_trait;
use skein_torrent_core::{
    AddTorrent, ContentListing, FilePriority, LeafId, PeerInfo, SessionStats, TorrentAction,
    TorrentDetails, TorrentError, TorrentId, TorrentInspector, TorrentResult, TorrentSummary,
    TorrentWorkflow, TrackerInfo,
};
use tokio::sync::Mutex;

/// One mutating call observed by [`FakeDaemon`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `add_torrent` request.
    Add(AddTorrent),
    /// Lifecycle action applied to `ids`.
    Perform {
        /// Targeted torrents.
        ids: Vec<TorrentId>,
        /// Requested action.
        action: TorrentAction,
    },
    /// Wanted flag change.
    SetWanted {
        /// Torrent owning the files.
        id: TorrentId,
        /// Affected files.
        files: Vec<LeafId>,
        /// New flag.
        wanted: bool,
    },
    /// Priority change.
    SetPriority {
        /// Torrent owning the files.
        id: TorrentId,
        /// Affected files.
        files: Vec<LeafId>,
        /// New priority.
        priority: FilePriority,
    },
    /// Label replacement.
    SetLabels {
        /// Targeted torrents.
        ids: Vec<TorrentId>,
        /// New labels.
        labels: Vec<String>,
    },
    /// Download directory change.
    SetLocation {
        /// Targeted torrents.
        ids: Vec<TorrentId>,
        /// New directory.
        location: String,
        /// Whether existing data is moved.
        move_data: bool,
    },
    /// Path rename inside one torrent.
    RenamePath {
        /// Torrent owning the path.
        id: TorrentId,
        /// Current path relative to the torrent root.
        path: String,
        /// New last segment.
        name: String,
    },
    /// Announce URL appended.
    AddTracker {
        /// Torrent receiving the tracker.
        id: TorrentId,
        /// Announce URL.
        announce: String,
    },
    /// Announce URL replaced.
    ReplaceTracker {
        /// Torrent owning the tracker.
        id: TorrentId,
        /// Tracker being edited.
        tracker_id: i64,
        /// New announce URL.
        announce: String,
    },
    /// Tracker dropped.
    RemoveTracker {
        /// Torrent owning the tracker.
        id: TorrentId,
        /// Tracker being removed.
        tracker_id: i64,
    },
}

#[derive(Debug, Default)]
struct FakeState {
    stats: SessionStats,
    torrents: Vec<TorrentSummary>,
    content: HashMap<TorrentId, ContentListing>,
    peers: HashMap<TorrentId, Vec<PeerInfo>>,
    trackers: HashMap<TorrentId, Vec<TrackerInfo>>,
    details: HashMap<TorrentId, TorrentDetails>,
    free_space: HashMap<String, u64>,
    calls: Vec<RecordedCall>,
    reads: usize,
    fail_with: Option<String>,
    next_id: i64,
}

/// Scriptable stand-in for a daemon client.
///
/// Reads serve whatever was seeded; writes are recorded and otherwise ignored.
/// [`FakeDaemon::fail_next`] makes every call fail until cleared.
#[derive(Debug, Default)]
pub struct FakeDaemon {
    state: Mutex<FakeState>,
}

impl FakeDaemon {
    /// Empty daemon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the torrent list.
    pub async fn set_torrents(&self, torrents: Vec<TorrentSummary>) {
        self.state.lock().await.torrents = torrents;
    }

    /// Replace the session statistics.
    pub async fn set_stats(&self, stats: SessionStats) {
        self.state.lock().await.stats = stats;
    }

    /// Seed the file listing of one torrent.
    pub async fn set_content(&self, id: TorrentId, listing: ContentListing) {
        self.state.lock().await.content.insert(id, listing);
    }

    /// Seed the peers of one torrent.
    pub async fn set_peers(&self, id: TorrentId, peers: Vec<PeerInfo>) {
        self.state.lock().await.peers.insert(id, peers);
    }

    /// Seed the trackers of one torrent.
    pub async fn set_trackers(&self, id: TorrentId, trackers: Vec<TrackerInfo>) {
        self.state.lock().await.trackers.insert(id, trackers);
    }

    /// Seed the details of one torrent.
    pub async fn set_details(&self, id: TorrentId, details: TorrentDetails) {
        self.state.lock().await.details.insert(id, details);
    }

    /// Seed the free space reported for `path`.
    pub async fn set_free_space(&self, path: &str, bytes: u64) {
        self.state
            .lock()
            .await
            .free_space
            .insert(path.to_string(), bytes);
    }

    /// Fail every subsequent call with `message`, or stop failing with `None`.
    pub async fn fail_next(&self, message: Option<&str>) {
        self.state.lock().await.fail_with = message.map(str::to_string);
    }

    /// Mutating calls seen so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of read calls served so far.
    pub async fn reads(&self) -> usize {
        self.state.lock().await.reads
    }

    async fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&FakeState) -> TorrentResult<T> + Send,
    ) -> TorrentResult<T> {
        let mut state = self.state.lock().await;
        state.reads += 1;
        check(&state, operation, None)?;
        f(&state)
    }

    async fn record(
        &self,
        operation: &'static str,
        torrent_id: Option<TorrentId>,
        call: RecordedCall,
    ) -> TorrentResult<()> {
        let mut state = self.state.lock().await;
        check(&state, operation, torrent_id)?;
        state.calls.push(call);
        Ok(())
    }
}

fn check(
    state: &FakeState,
    operation: &'static str,
    torrent_id: Option<TorrentId>,
) -> TorrentResult<()> {
    match &state.fail_with {
        Some(message) => Err(TorrentError::failed(
            operation,
            torrent_id,
            message.clone(),
        )),
        None => Ok(()),
    }
}

#[async_trait]
impl TorrentInspector for FakeDaemon {
    async fn session_stats(&self) -> TorrentResult<SessionStats> {
        self.read("session.stats", |state| Ok(state.stats)).await
    }

    async fn list(&self) -> TorrentResult<Vec<TorrentSummary>> {
        self.read("torrent.list", |state| Ok(state.torrents.clone()))
            .await
    }

    async fn content(&self, id: TorrentId) -> TorrentResult<ContentListing> {
        self.read("torrent.content", |state| {
            state
                .content
                .get(&id)
                .cloned()
                .ok_or(TorrentError::NotFound { torrent_id: id })
        })
        .await
    }

    async fn peers(&self, id: TorrentId) -> TorrentResult<Vec<PeerInfo>> {
        self.read("torrent.peers", |state| {
            Ok(state.peers.get(&id).cloned().unwrap_or_default())
        })
        .await
    }

    async fn trackers(&self, id: TorrentId) -> TorrentResult<Vec<TrackerInfo>> {
        self.read("torrent.trackers", |state| {
            state
                .trackers
                .get(&id)
                .cloned()
                .ok_or(TorrentError::NotFound { torrent_id: id })
        })
        .await
    }

    async fn details(&self, id: TorrentId) -> TorrentResult<TorrentDetails> {
        self.read("torrent.details", |state| {
            state
                .details
                .get(&id)
                .cloned()
                .ok_or(TorrentError::NotFound { torrent_id: id })
        })
        .await
    }

    async fn free_space(&self, path: &str) -> TorrentResult<u64> {
        self.read("session.free_space", |state| {
            state.free_space.get(path).copied().ok_or_else(|| {
                TorrentError::failed(
                    "session.free_space",
                    None,
                    format!("daemon cannot read '{path}'"),
                )
            })
        })
        .await
    }
}

#[async_trait]
impl TorrentWorkflow for FakeDaemon {
    async fn add_torrent(&self, request: AddTorrent) -> TorrentResult<Option<TorrentId>> {
        self.record("torrent.add", None, RecordedCall::Add(request))
            .await?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        Ok(Some(TorrentId(state.next_id)))
    }

    async fn perform(&self, ids: &[TorrentId], action: TorrentAction) -> TorrentResult<()> {
        self.record(
            "torrent.action",
            ids.first().copied(),
            RecordedCall::Perform {
                ids: ids.to_vec(),
                action,
            },
        )
        .await
    }

    async fn set_files_wanted(
        &self,
        id: TorrentId,
        files: &[LeafId],
        wanted: bool,
    ) -> TorrentResult<()> {
        self.record(
            "torrent.files_wanted",
            Some(id),
            RecordedCall::SetWanted {
                id,
                files: files.to_vec(),
                wanted,
            },
        )
        .await
    }

    async fn set_files_priority(
        &self,
        id: TorrentId,
        files: &[LeafId],
        priority: FilePriority,
    ) -> TorrentResult<()> {
        self.record(
            "torrent.files_priority",
            Some(id),
            RecordedCall::SetPriority {
                id,
                files: files.to_vec(),
                priority,
            },
        )
        .await
    }

    async fn set_labels(&self, ids: &[TorrentId], labels: &[String]) -> TorrentResult<()> {
        self.record(
            "torrent.labels",
            ids.first().copied(),
            RecordedCall::SetLabels {
                ids: ids.to_vec(),
                labels: labels.to_vec(),
            },
        )
        .await
    }

    async fn set_location(
        &self,
        ids: &[TorrentId],
        location: &str,
        move_data: bool,
    ) -> TorrentResult<()> {
        self.record(
            "torrent.location",
            ids.first().copied(),
            RecordedCall::SetLocation {
                ids: ids.to_vec(),
                location: location.to_string(),
                move_data,
            },
        )
        .await
    }

    async fn rename_path(&self, id: TorrentId, path: &str, name: &str) -> TorrentResult<()> {
        self.record(
            "torrent.rename",
            Some(id),
            RecordedCall::RenamePath {
                id,
                path: path.to_string(),
                name: name.to_string(),
            },
        )
        .await
    }

    async fn add_tracker(&self, id: TorrentId, announce: &str) -> TorrentResult<()> {
        self.record(
            "torrent.tracker_add",
            Some(id),
            RecordedCall::AddTracker {
                id,
                announce: announce.to_string(),
            },
        )
        .await
    }

    async fn replace_tracker(
        &self,
        id: TorrentId,
        tracker_id: i64,
        announce: &str,
    ) -> TorrentResult<()> {
        self.record(
            "torrent.tracker_replace",
            Some(id),
            RecordedCall::ReplaceTracker {
                id,
                tracker_id,
                announce: announce.to_string(),
            },
        )
        .await
    }

    async fn remove_tracker(&self, id: TorrentId, tracker_id: i64) -> TorrentResult<()> {
        self.record(
            "torrent.tracker_remove",
            Some(id),
            RecordedCall::RemoveTracker { id, tracker_id },
        )
        .await
    }
}
