//! Core torrent domain types and DTOs shared across the workspace.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Daemon-assigned torrent identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TorrentId(pub i64);

impl Display for TorrentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Index of a file within its torrent, as reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafId(pub u32);

impl Display for LeafId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Download priority of a single file.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilePriority {
    /// Throttled priority.
    Low,
    /// Default priority assigned by the daemon.
    #[default]
    Normal,
    /// Highest priority for urgent files.
    High,
}

impl FilePriority {
    /// Map the daemon's numeric level (`-1`, `0`, `1`) onto a priority.
    ///
    /// Out-of-range values clamp to the nearest level.
    #[must_use]
    pub const fn from_level(level: i64) -> Self {
        if level < 0 {
            Self::Low
        } else if level > 0 {
            Self::High
        } else {
            Self::Normal
        }
    }

    /// Numeric level understood by the daemon.
    #[must_use]
    pub const fn level(self) -> i64 {
        match self {
            Self::Low => -1,
            Self::Normal => 0,
            Self::High => 1,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

/// One file of a torrent as reported by the daemon.
///
/// Records are immutable once produced; selection edits are tracked by the
/// content tree rather than written back here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    /// Index of the file within the torrent.
    pub id: LeafId,
    /// Non-empty path segments relative to the torrent's download directory.
    pub path: Vec<String>,
    /// Total size in bytes.
    pub size: u64,
    /// Bytes downloaded so far, never more than `size`.
    pub completed: u64,
    /// Current download priority.
    pub priority: FilePriority,
    /// Whether the file is marked for download.
    pub wanted: bool,
}

impl LeafRecord {
    /// Build a record from a `/`-separated path, dropping empty segments and
    /// clamping `completed` to `size`.
    #[must_use]
    pub fn new(
        id: LeafId,
        path: &str,
        size: u64,
        completed: u64,
        priority: FilePriority,
        wanted: bool,
    ) -> Self {
        Self {
            id,
            path: split_path(path),
            size,
            completed: completed.min(size),
            priority,
            wanted,
        }
    }

    /// Path segments joined with `/`.
    #[must_use]
    pub fn joined_path(&self) -> String {
        self.path.join("/")
    }

    /// Last path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Completed fraction in `[0, 1]`; zero-length files report `0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        fraction(self.completed, self.size)
    }
}

/// Split a `/`-separated path into its non-empty segments.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// `part / whole`, or `0` when `whole` is zero.
#[must_use]
pub fn fraction(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        to_f64(part) / to_f64(whole)
    }
}

#[allow(clippy::cast_precision_loss)]
const fn to_f64(value: u64) -> f64 {
    value as f64
}

/// Flat file listing of one torrent, in daemon-native order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentListing {
    /// Download directory the paths are relative to.
    pub base_path: String,
    /// One record per file.
    pub leaves: Vec<LeafRecord>,
}

/// Lifecycle state reported by the daemon for a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TorrentStatusKind {
    /// Paused by the user or finished seeding.
    #[default]
    Stopped,
    /// Queued for a hash check.
    CheckWait,
    /// Hash check in progress.
    Checking,
    /// Queued for download.
    DownloadWait,
    /// Actively downloading.
    Downloading,
    /// Queued for seeding.
    SeedWait,
    /// Actively seeding.
    Seeding,
}

impl TorrentStatusKind {
    /// Map the daemon's numeric status code; unknown codes read as stopped.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::CheckWait,
            2 => Self::Checking,
            3 => Self::DownloadWait,
            4 => Self::Downloading,
            5 => Self::SeedWait,
            6 => Self::Seeding,
            _ => Self::Stopped,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::CheckWait => "Check wait",
            Self::Checking => "Checking",
            Self::DownloadWait | Self::SeedWait => "Queued",
            Self::Downloading => "Downloading",
            Self::Seeding => "Seeding",
        }
    }
}

/// Row of the torrent list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorrentSummary {
    /// Daemon identifier.
    pub id: TorrentId,
    /// Display name.
    pub name: String,
    /// Labels (categories) attached to the torrent.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Unix timestamp (seconds) when the torrent was added.
    pub added_at: i64,
    /// Lifecycle state.
    pub status: TorrentStatusKind,
    /// Completed fraction of the wanted data in `[0, 1]`.
    pub percent_done: f64,
    /// Bytes that will be on disk once the wanted files complete.
    pub size_when_done: u64,
    /// Current download rate in bytes per second.
    pub download_bps: u64,
    /// Current upload rate in bytes per second.
    pub upload_bps: u64,
    /// Estimated seconds to completion, when known.
    pub eta_seconds: Option<u64>,
    /// Connected peer count.
    pub peers_connected: u32,
    /// Daemon error code; non-zero means the torrent is errored.
    pub error_code: i64,
    /// Daemon error description, when errored.
    pub error_message: Option<String>,
    /// Download directory.
    pub download_dir: Option<String>,
}

impl TorrentSummary {
    /// Whether the daemon reported an error for this torrent.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error_code != 0
    }

    /// Whether any data is currently moving in either direction.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.download_bps > 0 || self.upload_bps > 0
    }
}

/// Aggregate transfer statistics for the daemon session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Number of torrents known to the daemon.
    pub torrent_count: u32,
    /// Torrents that are not paused.
    pub active_torrent_count: u32,
    /// Paused torrents.
    pub paused_torrent_count: u32,
    /// Session download rate in bytes per second.
    pub download_bps: u64,
    /// Session upload rate in bytes per second.
    pub upload_bps: u64,
}

/// One peer connected to a torrent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Remote address.
    pub address: String,
    /// Client software reported by the peer.
    pub client_name: String,
    /// Daemon-specific connection flags.
    pub flags: String,
    /// Fraction of the torrent the peer has, in `[0, 1]`.
    pub progress: f64,
    /// Rate we download from the peer, bytes per second.
    pub download_bps: u64,
    /// Rate we upload to the peer, bytes per second.
    pub upload_bps: u64,
}

/// One tracker announce URL of a torrent and its last announce outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerInfo {
    /// Daemon-assigned tracker identifier, unique within the torrent.
    pub id: i64,
    /// Announce URL.
    pub announce: String,
    /// Human-readable result of the last announce.
    pub last_announce_result: String,
    /// Peers returned by the last announce, when the tracker reported any.
    pub last_announce_peer_count: Option<u32>,
    /// Seeders known to the tracker, when reported.
    pub seeder_count: Option<u32>,
}

/// Descriptive details of one torrent beyond what the list shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorrentDetails {
    /// Daemon identifier.
    pub id: TorrentId,
    /// Display name.
    pub name: String,
    /// Info hash, hex encoded.
    pub hash: String,
    /// Labels (categories) attached to the torrent.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Download directory.
    pub download_dir: String,
    /// Comment embedded in the metainfo.
    pub comment: String,
    /// Program that created the metainfo.
    pub creator: String,
    /// Unix timestamp (seconds) the metainfo was created, `0` when unknown.
    pub created_at: i64,
    /// Unix timestamp (seconds) when the torrent was added.
    pub added_at: i64,
    /// Total size of every file, wanted or not.
    pub total_size: u64,
    /// Bytes uploaded over the torrent's lifetime.
    pub uploaded_bytes: u64,
    /// Upload ratio; `None` while the daemon cannot compute one.
    pub upload_ratio: Option<f64>,
    /// Daemon error description, when errored.
    pub error_message: Option<String>,
}

/// Lifecycle commands applicable to one or more torrents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TorrentAction {
    /// Resume transfers.
    Start,
    /// Pause transfers.
    Stop,
    /// Re-hash local data.
    Verify,
    /// Ask trackers for more peers now.
    Reannounce,
    /// Remove the torrent from the daemon.
    Remove {
        /// Whether downloaded data is deleted as well.
        delete_data: bool,
    },
}

impl TorrentAction {
    /// Short verb used in status messages and logs.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Verify => "verify",
            Self::Reannounce => "reannounce",
            Self::Remove { delete_data: false } => "remove",
            Self::Remove { delete_data: true } => "remove with data",
        }
    }
}

/// Source describing how a torrent should be added to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TorrentSource {
    /// Magnet URI or remote URL the daemon fetches itself.
    Link {
        /// Magnet URI or HTTP(S) URL.
        uri: String,
    },
    /// Raw `.torrent` metainfo bytes read locally.
    Metainfo {
        /// Bencoded metainfo payload.
        bytes: Vec<u8>,
    },
}

impl TorrentSource {
    #[must_use]
    /// Convenience constructor for link-based sources.
    pub fn link(uri: impl Into<String>) -> Self {
        Self::Link { uri: uri.into() }
    }

    #[must_use]
    /// Convenience constructor for metainfo-based sources.
    pub fn metainfo(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Metainfo {
            bytes: bytes.into(),
        }
    }
}

/// Request payload for adding a torrent to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTorrent {
    /// How the torrent should be retrieved.
    pub source: TorrentSource,
    #[serde(default)]
    /// Optional knobs applied alongside admission.
    pub options: AddTorrentOptions,
}

/// Optional knobs that accompany an add request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AddTorrentOptions {
    /// Override for the daemon's default download directory.
    pub download_dir: Option<String>,
    #[serde(default)]
    /// Labels (categories) to attach.
    pub labels: Vec<String>,
    #[serde(default)]
    /// Whether the torrent starts paused.
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torrent_source_helpers_construct_variants() {
        let link = TorrentSource::link("magnet:?xt=urn:btih:demo");
        match link {
            TorrentSource::Link { uri } => assert!(uri.contains("demo")),
            TorrentSource::Metainfo { .. } => panic!("expected link variant"),
        }

        let data = vec![1_u8, 2, 3];
        let meta = TorrentSource::metainfo(data.clone());
        match meta {
            TorrentSource::Metainfo { bytes } => assert_eq!(bytes, data),
            TorrentSource::Link { .. } => panic!("expected metainfo variant"),
        }
    }

    #[test]
    fn leaf_record_splits_path_and_clamps_completed() {
        let record = LeafRecord::new(
            LeafId(3),
            "/show//s01/e01.mkv",
            10,
            25,
            FilePriority::High,
            true,
        );
        assert_eq!(record.path, vec!["show", "s01", "e01.mkv"]);
        assert_eq!(record.joined_path(), "show/s01/e01.mkv");
        assert_eq!(record.file_name(), "e01.mkv");
        assert_eq!(record.completed, 10);
        assert!((record.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_handles_zero_size() {
        let empty = LeafRecord::new(LeafId(0), "empty", 0, 0, FilePriority::Normal, true);
        assert!(empty.progress().abs() < f64::EPSILON);
        assert!((fraction(1, 4) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn priority_levels_round_trip_and_clamp() {
        for priority in [FilePriority::Low, FilePriority::Normal, FilePriority::High] {
            assert_eq!(FilePriority::from_level(priority.level()), priority);
        }
        assert_eq!(FilePriority::from_level(-7), FilePriority::Low);
        assert_eq!(FilePriority::from_level(3), FilePriority::High);
    }

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(TorrentStatusKind::from_code(4), TorrentStatusKind::Downloading);
        assert_eq!(TorrentStatusKind::from_code(6), TorrentStatusKind::Seeding);
        assert_eq!(TorrentStatusKind::from_code(42), TorrentStatusKind::Stopped);
        assert_eq!(TorrentStatusKind::SeedWait.as_str(), "Queued");
    }

    #[test]
    fn summary_flags_errors_and_activity() {
        let summary = TorrentSummary {
            upload_bps: 12,
            error_code: 2,
            ..TorrentSummary::default()
        };
        assert!(summary.has_error());
        assert!(summary.is_active());
        assert!(!TorrentSummary::default().is_active());
    }

    #[test]
    fn action_serializes_with_tag() -> anyhow::Result<()> {
        let json = serde_json::to_value(TorrentAction::Remove { delete_data: true })?;
        assert_eq!(json["type"], "remove");
        assert_eq!(json["delete_data"], true);
        assert_eq!(TorrentAction::Verify.verb(), "verify");
        Ok(())
    }
}
