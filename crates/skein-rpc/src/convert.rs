//! Mapping from daemon wire shapes onto the domain types.

use skein_torrent_core::{
    ContentListing, FilePriority, LeafId, LeafRecord, PeerInfo, SessionStats, TorrentDetails,
    TorrentId, TorrentStatusKind, TorrentSummary, TrackerInfo,
};
use tracing::warn;

use crate::wire::{
    WireContent, WireDetails, WirePeer, WireSessionStats, WireTorrent, WireTrackerStat,
};

pub(crate) fn summary(wire: WireTorrent) -> TorrentSummary {
    TorrentSummary {
        id: TorrentId(wire.id),
        name: wire.name,
        labels: wire.labels,
        added_at: wire.added_date,
        status: TorrentStatusKind::from_code(wire.status),
        percent_done: wire.percent_done.clamp(0.0, 1.0),
        size_when_done: wire.size_when_done,
        download_bps: wire.rate_download,
        upload_bps: wire.rate_upload,
        eta_seconds: u64::try_from(wire.eta).ok(),
        peers_connected: wire.peers_connected,
        error_code: wire.error,
        error_message: non_empty(wire.error_string),
        download_dir: non_empty(wire.download_dir),
    }
}

/// Zip `files` with `fileStats`; the file index is the leaf id.
///
/// Missing stats read as wanted at normal priority.
pub(crate) fn content(wire: WireContent) -> ContentListing {
    if wire.file_stats.len() != wire.files.len() {
        warn!(
            torrent_id = wire.id,
            files = wire.files.len(),
            stats = wire.file_stats.len(),
            "file stats do not line up with files"
        );
    }
    let mut stats = wire.file_stats.into_iter();
    let leaves = wire
        .files
        .into_iter()
        .enumerate()
        .filter_map(|(index, file)| {
            let stat = stats.next().unwrap_or_default();
            let id = u32::try_from(index).ok()?;
            Some(LeafRecord::new(
                LeafId(id),
                &file.name,
                file.length,
                file.bytes_completed,
                FilePriority::from_level(stat.priority),
                stat.wanted,
            ))
        })
        .collect();
    ContentListing {
        base_path: wire.download_dir,
        leaves,
    }
}

pub(crate) fn peer(wire: WirePeer) -> PeerInfo {
    PeerInfo {
        address: wire.address,
        client_name: wire.client_name,
        flags: wire.flag_str,
        progress: wire.progress.clamp(0.0, 1.0),
        download_bps: wire.rate_to_client,
        upload_bps: wire.rate_to_peer,
    }
}

pub(crate) fn tracker(wire: WireTrackerStat) -> TrackerInfo {
    TrackerInfo {
        id: wire.id,
        announce: wire.announce,
        last_announce_result: wire.last_announce_result,
        last_announce_peer_count: reported_count(wire.last_announce_peer_count),
        seeder_count: reported_count(wire.seeder_count),
    }
}

/// Negative ratios are the daemon's "not available" and "infinite" markers.
pub(crate) fn details(wire: WireDetails) -> TorrentDetails {
    TorrentDetails {
        id: TorrentId(wire.id),
        name: wire.name,
        hash: wire.hash_string,
        labels: wire.labels,
        download_dir: wire.download_dir,
        comment: wire.comment,
        creator: wire.creator,
        created_at: wire.date_created,
        added_at: wire.added_date,
        total_size: wire.total_size,
        uploaded_bytes: wire.uploaded_ever,
        upload_ratio: (wire.upload_ratio >= 0.0).then_some(wire.upload_ratio),
        error_message: non_empty(wire.error_string),
    }
}

/// Trackers report `-1` (and sometimes `0`) for counts they never sent.
fn reported_count(count: i64) -> Option<u32> {
    u32::try_from(count).ok().filter(|count| *count > 0)
}

pub(crate) const fn session_stats(wire: &WireSessionStats) -> SessionStats {
    SessionStats {
        torrent_count: wire.torrent_count,
        active_torrent_count: wire.active_torrent_count,
        paused_torrent_count: wire.paused_torrent_count,
        download_bps: wire.download_speed,
        upload_bps: wire.upload_speed,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{WireFile, WireFileStat};

    #[test]
    fn summary_maps_unknown_eta_and_blank_errors_to_none() {
        let mapped = summary(WireTorrent {
            id: 3,
            name: "debian.iso".into(),
            status: 6,
            eta: -1,
            percent_done: 1.0,
            ..WireTorrent::default()
        });
        assert_eq!(mapped.id, TorrentId(3));
        assert_eq!(mapped.status, TorrentStatusKind::Seeding);
        assert_eq!(mapped.eta_seconds, None);
        assert_eq!(mapped.error_message, None);
        assert_eq!(mapped.download_dir, None);
    }

    #[test]
    fn tracker_counts_hide_unreported_values() {
        let mapped = tracker(WireTrackerStat {
            id: 2,
            announce: "udp://tracker.example:6969".into(),
            last_announce_result: "Success".into(),
            last_announce_peer_count: 17,
            seeder_count: -1,
        });
        assert_eq!(mapped.id, 2);
        assert_eq!(mapped.last_announce_peer_count, Some(17));
        assert_eq!(mapped.seeder_count, None);
        let silent = tracker(WireTrackerStat::default());
        assert_eq!(silent.last_announce_peer_count, None);
    }

    #[test]
    fn details_drop_unavailable_ratio_and_blank_error() {
        let mapped = details(WireDetails {
            id: 4,
            upload_ratio: -1.0,
            ..WireDetails::default()
        });
        assert_eq!(mapped.id, TorrentId(4));
        assert_eq!(mapped.upload_ratio, None);
        assert_eq!(mapped.error_message, None);
        let seeded = details(WireDetails {
            upload_ratio: 1.5,
            error_string: "tracker gone".into(),
            ..WireDetails::default()
        });
        assert_eq!(seeded.upload_ratio, Some(1.5));
        assert_eq!(seeded.error_message.as_deref(), Some("tracker gone"));
    }

    #[test]
    fn content_zips_files_with_stats_by_index() {
        let listing = content(WireContent {
            id: 1,
            download_dir: "/srv/downloads".into(),
            files: vec![
                WireFile {
                    name: "show/e01.mkv".into(),
                    length: 100,
                    bytes_completed: 40,
                },
                WireFile {
                    name: "show/e02.mkv".into(),
                    length: 100,
                    bytes_completed: 0,
                },
            ],
            file_stats: vec![WireFileStat {
                bytes_completed: 40,
                wanted: false,
                priority: -1,
            }],
        });
        assert_eq!(listing.base_path, "/srv/downloads");
        assert_eq!(listing.leaves.len(), 2);
        let first = &listing.leaves[0];
        assert_eq!(first.id, LeafId(0));
        assert_eq!(first.path, vec!["show", "e01.mkv"]);
        assert!(!first.wanted);
        assert_eq!(first.priority, FilePriority::Low);
        let second = &listing.leaves[1];
        assert_eq!(second.id, LeafId(1));
        assert!(second.wanted);
        assert_eq!(second.priority, FilePriority::Normal);
    }
}
