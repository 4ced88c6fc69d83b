//! Request and response bodies exchanged with the daemon.

use serde::{Deserialize, Serialize};

pub(crate) const LIST_FIELDS: &[&str] = &[
    "id",
    "name",
    "labels",
    "addedDate",
    "status",
    "percentDone",
    "sizeWhenDone",
    "rateDownload",
    "rateUpload",
    "eta",
    "peersConnected",
    "error",
    "errorString",
    "downloadDir",
];

pub(crate) const CONTENT_FIELDS: &[&str] = &["id", "downloadDir", "files", "fileStats"];

pub(crate) const PEER_FIELDS: &[&str] = &["id", "peers"];

pub(crate) const TRACKER_FIELDS: &[&str] = &["id", "trackerStats"];

pub(crate) const DETAIL_FIELDS: &[&str] = &[
    "id",
    "name",
    "hashString",
    "labels",
    "downloadDir",
    "comment",
    "creator",
    "dateCreated",
    "addedDate",
    "totalSize",
    "uploadedEver",
    "uploadRatio",
    "errorString",
];

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a, A> {
    pub(crate) method: &'a str,
    pub(crate) arguments: A,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Response<R> {
    pub(crate) result: String,
    #[serde(default)]
    pub(crate) arguments: Option<R>,
}

/// Arguments-less calls still send `{}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Empty {}

#[derive(Debug, Serialize)]
pub(crate) struct TorrentGetArgs<'a> {
    pub(crate) fields: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct TorrentGetResult<T> {
    #[serde(default)]
    pub(crate) torrents: Vec<T>,
}

impl<T> Default for TorrentGetResult<T> {
    fn default() -> Self {
        Self {
            torrents: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireTorrent {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) labels: Vec<String>,
    pub(crate) added_date: i64,
    pub(crate) status: i64,
    pub(crate) percent_done: f64,
    pub(crate) size_when_done: u64,
    pub(crate) rate_download: u64,
    pub(crate) rate_upload: u64,
    pub(crate) eta: i64,
    pub(crate) peers_connected: u32,
    pub(crate) error: i64,
    pub(crate) error_string: String,
    pub(crate) download_dir: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireContent {
    pub(crate) id: i64,
    pub(crate) download_dir: String,
    pub(crate) files: Vec<WireFile>,
    pub(crate) file_stats: Vec<WireFileStat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireFile {
    pub(crate) name: String,
    pub(crate) length: u64,
    pub(crate) bytes_completed: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireFileStat {
    pub(crate) bytes_completed: u64,
    pub(crate) wanted: bool,
    pub(crate) priority: i64,
}

impl Default for WireFileStat {
    fn default() -> Self {
        Self {
            bytes_completed: 0,
            wanted: true,
            priority: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WirePeers {
    pub(crate) id: i64,
    pub(crate) peers: Vec<WirePeer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WirePeer {
    pub(crate) address: String,
    pub(crate) client_name: String,
    pub(crate) flag_str: String,
    pub(crate) progress: f64,
    pub(crate) rate_to_client: u64,
    pub(crate) rate_to_peer: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireTrackers {
    pub(crate) id: i64,
    pub(crate) tracker_stats: Vec<WireTrackerStat>,
}

/// Counts are `-1` when the tracker has not reported them.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireTrackerStat {
    pub(crate) id: i64,
    pub(crate) announce: String,
    pub(crate) last_announce_result: String,
    pub(crate) last_announce_peer_count: i64,
    pub(crate) seeder_count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireDetails {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) hash_string: String,
    pub(crate) labels: Vec<String>,
    pub(crate) download_dir: String,
    pub(crate) comment: String,
    pub(crate) creator: String,
    pub(crate) date_created: i64,
    pub(crate) added_date: i64,
    pub(crate) total_size: u64,
    pub(crate) uploaded_ever: u64,
    pub(crate) upload_ratio: f64,
    pub(crate) error_string: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireSessionStats {
    pub(crate) active_torrent_count: u32,
    pub(crate) paused_torrent_count: u32,
    pub(crate) torrent_count: u32,
    pub(crate) download_speed: u64,
    pub(crate) upload_speed: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct IdsArgs<'a> {
    pub(crate) ids: &'a [i64],
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveArgs<'a> {
    pub(crate) ids: &'a [i64],
    #[serde(rename = "delete-local-data")]
    pub(crate) delete_local_data: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct LabelsArgs<'a> {
    pub(crate) ids: &'a [i64],
    pub(crate) labels: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct LocationArgs<'a> {
    pub(crate) ids: &'a [i64],
    pub(crate) location: &'a str,
    #[serde(rename = "move")]
    pub(crate) move_data: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenamePathArgs<'a> {
    pub(crate) ids: [i64; 1],
    pub(crate) path: &'a str,
    pub(crate) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FreeSpaceArgs<'a> {
    pub(crate) path: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FreeSpaceResult {
    pub(crate) path: String,
    #[serde(rename = "size-bytes")]
    pub(crate) size_bytes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct AddArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) metainfo: Option<String>,
    pub(crate) paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) download_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddResult {
    #[serde(rename = "torrent-added")]
    pub(crate) added: Option<AddedTorrent>,
    #[serde(rename = "torrent-duplicate")]
    pub(crate) duplicate: Option<AddedTorrent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct AddedTorrent {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) hash_string: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn torrent_get_omits_ids_for_full_listing() -> Result<(), serde_json::Error> {
        let body = serde_json::to_value(Request {
            method: "torrent-get",
            arguments: TorrentGetArgs {
                fields: &["id", "name"],
                ids: None,
            },
        })?;
        assert_eq!(
            body,
            json!({"method": "torrent-get", "arguments": {"fields": ["id", "name"]}})
        );
        Ok(())
    }

    #[test]
    fn missing_file_stats_default_to_wanted() -> Result<(), serde_json::Error> {
        let stat: WireFileStat = serde_json::from_value(json!({"priority": 1}))?;
        assert!(stat.wanted);
        assert_eq!(stat.priority, 1);
        Ok(())
    }

    #[test]
    fn location_args_use_the_move_keyword() -> Result<(), serde_json::Error> {
        let body = serde_json::to_value(LocationArgs {
            ids: &[1, 2],
            location: "/archive",
            move_data: true,
        })?;
        assert_eq!(
            body,
            json!({"ids": [1, 2], "location": "/archive", "move": true})
        );
        Ok(())
    }

    #[test]
    fn add_result_distinguishes_duplicates() -> Result<(), serde_json::Error> {
        let result: AddResult = serde_json::from_value(json!({
            "torrent-duplicate": {"id": 4, "name": "x", "hashString": "abc"}
        }))?;
        assert!(result.added.is_none());
        assert_eq!(result.duplicate.map(|t| t.id), Some(4));
        Ok(())
    }
}
