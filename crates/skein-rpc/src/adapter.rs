//! `TorrentInspector` and `TorrentWorkflow` on top of the RPC transport.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use skein_torrent_core::{
    AddTorrent, ContentListing, FilePriority, LeafId, PeerInfo, SessionStats, TorrentAction,
    TorrentDetails, TorrentError, TorrentId, TorrentInspector, TorrentResult, TorrentSource,
    TorrentSummary, TorrentWorkflow, TrackerInfo,
};
use tracing::info;

use crate::client::TransmissionClient;
use crate::convert;
use crate::error::op_failed;
use crate::wire::{
    AddArgs, AddResult, CONTENT_FIELDS, DETAIL_FIELDS, Empty, FreeSpaceArgs, FreeSpaceResult,
    IdsArgs, LIST_FIELDS, LabelsArgs, LocationArgs, PEER_FIELDS, RemoveArgs, RenamePathArgs,
    TRACKER_FIELDS, TorrentGetArgs, TorrentGetResult, WireContent, WireDetails, WirePeers,
    WireSessionStats, WireTorrent, WireTrackers,
};

fn raw_ids(ids: &[TorrentId]) -> Vec<i64> {
    ids.iter().map(|id| id.0).collect()
}

fn file_indices(files: &[LeafId]) -> Vec<u32> {
    files.iter().map(|leaf| leaf.0).collect()
}

const fn action_method(action: TorrentAction) -> &'static str {
    match action {
        TorrentAction::Start => "torrent-start",
        TorrentAction::Stop => "torrent-stop",
        TorrentAction::Verify => "torrent-verify",
        TorrentAction::Reannounce => "torrent-reannounce",
        TorrentAction::Remove { .. } => "torrent-remove",
    }
}

const fn priority_key(priority: FilePriority) -> &'static str {
    match priority {
        FilePriority::Low => "priority-low",
        FilePriority::Normal => "priority-normal",
        FilePriority::High => "priority-high",
    }
}

impl TransmissionClient {
    /// `torrent-set` on one torrent with a single mutator key.
    async fn torrent_set(
        &self,
        operation: &'static str,
        id: TorrentId,
        key: &str,
        value: Value,
    ) -> TorrentResult<()> {
        let mut arguments = Map::new();
        arguments.insert("ids".into(), json!([id.0]));
        arguments.insert(key.into(), value);
        self.call::<_, Empty>("torrent-set", Value::Object(arguments))
            .await
            .map_err(op_failed(operation, Some(id)))?;
        Ok(())
    }

    /// `torrent-get` for a single torrent; an empty answer means it is gone.
    async fn torrent_get_one<T>(
        &self,
        operation: &'static str,
        id: TorrentId,
        fields: &[&str],
    ) -> TorrentResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let result: TorrentGetResult<T> = self
            .call(
                "torrent-get",
                TorrentGetArgs {
                    fields,
                    ids: Some(vec![id.0]),
                },
            )
            .await
            .map_err(op_failed(operation, Some(id)))?;
        result
            .torrents
            .into_iter()
            .next()
            .ok_or(TorrentError::NotFound { torrent_id: id })
    }
}

#[async_trait]
impl TorrentInspector for TransmissionClient {
    async fn session_stats(&self) -> TorrentResult<SessionStats> {
        let stats: WireSessionStats = self
            .call("session-stats", Empty {})
            .await
            .map_err(op_failed("session.stats", None))?;
        Ok(convert::session_stats(&stats))
    }

    async fn list(&self) -> TorrentResult<Vec<TorrentSummary>> {
        let result: TorrentGetResult<WireTorrent> = self
            .call(
                "torrent-get",
                TorrentGetArgs {
                    fields: LIST_FIELDS,
                    ids: None,
                },
            )
            .await
            .map_err(op_failed("torrent.list", None))?;
        Ok(result.torrents.into_iter().map(convert::summary).collect())
    }

    async fn content(&self, id: TorrentId) -> TorrentResult<ContentListing> {
        let torrent: WireContent = self
            .torrent_get_one("torrent.content", id, CONTENT_FIELDS)
            .await?;
        Ok(convert::content(torrent))
    }

    async fn peers(&self, id: TorrentId) -> TorrentResult<Vec<PeerInfo>> {
        let torrent: WirePeers = self.torrent_get_one("torrent.peers", id, PEER_FIELDS).await?;
        Ok(torrent.peers.into_iter().map(convert::peer).collect())
    }

    async fn trackers(&self, id: TorrentId) -> TorrentResult<Vec<TrackerInfo>> {
        let torrent: WireTrackers = self
            .torrent_get_one("torrent.trackers", id, TRACKER_FIELDS)
            .await?;
        Ok(torrent
            .tracker_stats
            .into_iter()
            .map(convert::tracker)
            .collect())
    }

    async fn details(&self, id: TorrentId) -> TorrentResult<TorrentDetails> {
        let torrent: WireDetails = self
            .torrent_get_one("torrent.details", id, DETAIL_FIELDS)
            .await?;
        Ok(convert::details(torrent))
    }

    async fn free_space(&self, path: &str) -> TorrentResult<u64> {
        let result: FreeSpaceResult = self
            .call("free-space", FreeSpaceArgs { path })
            .await
            .map_err(op_failed("session.free_space", None))?;
        u64::try_from(result.size_bytes).map_err(|_| {
            TorrentError::failed(
                "session.free_space",
                None,
                format!("daemon cannot read '{}'", result.path),
            )
        })
    }
}

#[async_trait]
impl TorrentWorkflow for TransmissionClient {
    async fn add_torrent(&self, request: AddTorrent) -> TorrentResult<Option<TorrentId>> {
        let AddTorrent { source, options } = request;
        let (filename, metainfo) = match source {
            TorrentSource::Link { uri } => (Some(uri), None),
            TorrentSource::Metainfo { bytes } => (None, Some(STANDARD.encode(bytes))),
        };
        let result: AddResult = self
            .call(
                "torrent-add",
                AddArgs {
                    filename,
                    metainfo,
                    paused: options.paused,
                    download_dir: options.download_dir,
                },
            )
            .await
            .map_err(op_failed("torrent.add", None))?;

        let added = match (result.added, result.duplicate) {
            (Some(added), _) => {
                info!(id = added.id, name = %added.name, "torrent added");
                Some(added)
            }
            (None, Some(duplicate)) => {
                info!(id = duplicate.id, hash = %duplicate.hash_string, "torrent already present");
                Some(duplicate)
            }
            (None, None) => None,
        };
        let id = added.map(|torrent| TorrentId(torrent.id));

        if let Some(id) = id
            && !options.labels.is_empty()
        {
            self.set_labels(&[id], &options.labels).await?;
        }
        Ok(id)
    }

    async fn perform(&self, ids: &[TorrentId], action: TorrentAction) -> TorrentResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let raw = raw_ids(ids);
        let method = action_method(action);
        let outcome = match action {
            TorrentAction::Remove { delete_data } => {
                self.call::<_, Empty>(
                    method,
                    RemoveArgs {
                        ids: &raw,
                        delete_local_data: delete_data,
                    },
                )
                .await
            }
            _ => self.call::<_, Empty>(method, IdsArgs { ids: &raw }).await,
        };
        outcome.map_err(op_failed("torrent.action", ids.first().copied()))?;
        info!(action = action.verb(), count = ids.len(), "torrent action sent");
        Ok(())
    }

    async fn set_files_wanted(
        &self,
        id: TorrentId,
        files: &[LeafId],
        wanted: bool,
    ) -> TorrentResult<()> {
        if files.is_empty() {
            return Ok(());
        }
        let key = if wanted { "files-wanted" } else { "files-unwanted" };
        self.torrent_set("torrent.files_wanted", id, key, json!(file_indices(files)))
            .await
    }

    async fn set_files_priority(
        &self,
        id: TorrentId,
        files: &[LeafId],
        priority: FilePriority,
    ) -> TorrentResult<()> {
        if files.is_empty() {
            return Ok(());
        }
        self.torrent_set(
            "torrent.files_priority",
            id,
            priority_key(priority),
            json!(file_indices(files)),
        )
        .await
    }

    async fn set_labels(&self, ids: &[TorrentId], labels: &[String]) -> TorrentResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let raw = raw_ids(ids);
        self.call::<_, Empty>("torrent-set", LabelsArgs { ids: &raw, labels })
            .await
            .map_err(op_failed("torrent.labels", ids.first().copied()))?;
        Ok(())
    }

    async fn set_location(
        &self,
        ids: &[TorrentId],
        location: &str,
        move_data: bool,
    ) -> TorrentResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let raw = raw_ids(ids);
        self.call::<_, Empty>(
            "torrent-set-location",
            LocationArgs {
                ids: &raw,
                location,
                move_data,
            },
        )
        .await
        .map_err(op_failed("torrent.location", ids.first().copied()))?;
        info!(location, move_data, count = ids.len(), "torrent location changed");
        Ok(())
    }

    async fn rename_path(&self, id: TorrentId, path: &str, name: &str) -> TorrentResult<()> {
        self.call::<_, Empty>(
            "torrent-rename-path",
            RenamePathArgs {
                ids: [id.0],
                path,
                name,
            },
        )
        .await
        .map_err(op_failed("torrent.rename", Some(id)))?;
        info!(torrent_id = %id, from = path, to = name, "torrent path renamed");
        Ok(())
    }

    async fn add_tracker(&self, id: TorrentId, announce: &str) -> TorrentResult<()> {
        self.torrent_set("torrent.tracker_add", id, "trackerAdd", json!([announce]))
            .await
    }

    async fn replace_tracker(
        &self,
        id: TorrentId,
        tracker_id: i64,
        announce: &str,
    ) -> TorrentResult<()> {
        self.torrent_set(
            "torrent.tracker_replace",
            id,
            "trackerReplace",
            json!([tracker_id, announce]),
        )
        .await
    }

    async fn remove_tracker(&self, id: TorrentId, tracker_id: i64) -> TorrentResult<()> {
        self.torrent_set(
            "torrent.tracker_remove",
            id,
            "trackerRemove",
            json!([tracker_id]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_daemon_methods() {
        assert_eq!(action_method(TorrentAction::Start), "torrent-start");
        assert_eq!(
            action_method(TorrentAction::Remove { delete_data: true }),
            "torrent-remove"
        );
        assert_eq!(priority_key(FilePriority::High), "priority-high");
    }
}
