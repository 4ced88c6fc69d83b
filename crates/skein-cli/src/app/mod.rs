//! Application state shared between the interactive task and the background
//! refreshers.
//!
//! # Design
//! - Everything the screen shows lives in one [`AppState`] behind the
//!   coordinator's mutex.
//! - State transitions are plain methods so they can be tested without a
//!   terminal or a daemon.

pub(crate) mod content;
pub(crate) mod coordinator;
pub(crate) mod list;
pub(crate) mod prompt;
pub(crate) mod trackers;

use skein_content::PriorityStep;
use skein_torrent_core::{
    PeerInfo, SessionStats, TorrentAction, TorrentDetails, TorrentError, TorrentId,
    TorrentResult, TorrentSummary,
};
use tracing::warn;

use self::content::ContentView;
use self::list::TorrentList;
use self::prompt::Prompt;
use self::trackers::TrackersView;

/// Severity of the status-bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusMessage {
    pub(crate) level: StatusLevel,
    pub(crate) text: String,
}

/// Peers of one torrent, refreshed in the background while open.
#[derive(Debug)]
pub(crate) struct PeersView {
    pub(crate) torrent: TorrentId,
    pub(crate) name: String,
    pub(crate) peers: Vec<PeerInfo>,
}

/// Descriptive details of one torrent, fetched once when opened.
#[derive(Debug)]
pub(crate) struct DetailsView {
    pub(crate) details: TorrentDetails,
    /// Space left in the download directory, when the daemon reported it.
    pub(crate) free_space: Option<u64>,
}

#[derive(Debug, Default)]
pub(crate) enum View {
    #[default]
    List,
    Content(ContentView),
    Peers(PeersView),
    Trackers(TrackersView),
    Details(DetailsView),
}

/// Which key map applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewKind {
    List,
    Content,
    Peers,
    Trackers,
    Details,
    Confirm,
    Prompt,
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    Quit,
    Refresh,
    MoveCursor(isize),
    ToggleSelection,
    SelectAll(bool),
    CycleSort,
    CycleStatusFilter,
    CycleCategory,
    OpenContent,
    OpenPeers,
    CloseView,
    Action(TorrentAction),
    RequestRemove { delete_data: bool },
    Confirm(bool),
    ToggleWanted,
    CyclePriority(PriorityStep),
    NextDirectory { top_level: bool },
    OpenTrackers,
    OpenDetails,
    StartSearch,
    StartMove,
    StartRename,
    StartLabels,
    StartAddTracker,
    StartReplaceTracker,
    RemoveTracker,
    PromptInput(char),
    PromptBackspace,
    /// Jump to the next search match without closing the prompt.
    SearchNext,
    PromptSubmit,
    PromptCancel,
}

#[derive(Debug, Default)]
pub(crate) struct AppState {
    pub(crate) list: TorrentList,
    pub(crate) stats: SessionStats,
    pub(crate) view: View,
    pub(crate) status: Option<StatusMessage>,
    /// Removal waiting for a yes/no answer.
    pub(crate) pending: Option<TorrentAction>,
    /// Text input capturing every key until submitted or cancelled.
    pub(crate) prompt: Option<Prompt>,
}

impl AppState {
    pub(crate) const fn view_kind(&self) -> ViewKind {
        if self.pending.is_some() {
            return ViewKind::Confirm;
        }
        if self.prompt.is_some() {
            return ViewKind::Prompt;
        }
        match self.view {
            View::List => ViewKind::List,
            View::Content(_) => ViewKind::Content,
            View::Peers(_) => ViewKind::Peers,
            View::Trackers(_) => ViewKind::Trackers,
            View::Details(_) => ViewKind::Details,
        }
    }

    pub(crate) fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level: StatusLevel::Info,
            text: text.into(),
        });
    }

    /// Show `error` until the next successful refresh.
    pub(crate) fn record_failure(&mut self, error: &TorrentError) {
        let text = error.describe();
        warn!(error = %text, "daemon call failed");
        self.status = Some(StatusMessage {
            level: StatusLevel::Error,
            text,
        });
    }

    fn clear_failure(&mut self) {
        if matches!(&self.status, Some(message) if message.level == StatusLevel::Error) {
            self.status = None;
        }
    }

    /// Apply one poll of session stats and the torrent list.
    pub(crate) fn apply_refresh(
        &mut self,
        stats: TorrentResult<SessionStats>,
        torrents: TorrentResult<Vec<TorrentSummary>>,
    ) {
        match (stats, torrents) {
            (Ok(stats), Ok(torrents)) => {
                self.stats = stats;
                self.list.replace(torrents);
                self.clear_failure();
            }
            (Err(err), _) | (_, Err(err)) => self.record_failure(&err),
        }
    }

    /// Apply one peers refresh; ignored when the peers view has moved on.
    pub(crate) fn apply_peers(
        &mut self,
        torrent: TorrentId,
        stats: TorrentResult<SessionStats>,
        peers: TorrentResult<Vec<PeerInfo>>,
    ) {
        let View::Peers(view) = &mut self.view else {
            return;
        };
        if view.torrent != torrent {
            return;
        }
        match (stats, peers) {
            (Ok(stats), Ok(peers)) => {
                view.peers = peers;
                self.stats = stats;
                self.clear_failure();
            }
            (Err(err), _) | (_, Err(err)) => self.record_failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> TorrentError {
        TorrentError::failed("torrent.list", None, "daemon unreachable")
    }

    #[test]
    fn failed_refresh_keeps_previous_list_and_shows_error() {
        let mut state = AppState::default();
        state.apply_refresh(
            Ok(SessionStats::default()),
            Ok(vec![TorrentSummary::default()]),
        );
        state.apply_refresh(Ok(SessionStats::default()), Err(failure()));
        assert_eq!(state.list.len(), 1);
        let status = state.status.clone();
        assert_eq!(
            status.map(|s| (s.level, s.text)),
            Some((
                StatusLevel::Error,
                "torrent.list: daemon unreachable".to_string()
            ))
        );

        state.apply_refresh(Ok(SessionStats::default()), Ok(Vec::new()));
        assert!(state.status.is_none());
        assert_eq!(state.list.len(), 0);
    }

    #[test]
    fn success_keeps_info_messages() {
        let mut state = AppState::default();
        state.info("start sent to 1 torrent(s)");
        state.apply_refresh(Ok(SessionStats::default()), Ok(Vec::new()));
        assert_eq!(
            state.status.map(|s| s.level),
            Some(StatusLevel::Info)
        );
    }

    #[test]
    fn peers_for_a_closed_view_are_dropped() {
        let mut state = AppState::default();
        state.apply_peers(
            TorrentId(1),
            Ok(SessionStats::default()),
            Ok(vec![PeerInfo::default()]),
        );
        assert!(matches!(state.view, View::List));

        state.view = View::Peers(PeersView {
            torrent: TorrentId(2),
            name: "two".into(),
            peers: Vec::new(),
        });
        state.apply_peers(
            TorrentId(1),
            Ok(SessionStats::default()),
            Ok(vec![PeerInfo::default()]),
        );
        let View::Peers(view) = &state.view else {
            panic!("peers view expected");
        };
        assert!(view.peers.is_empty());
    }

    #[test]
    fn pending_removal_takes_the_confirm_keymap() {
        let mut state = AppState::default();
        assert_eq!(state.view_kind(), ViewKind::List);
        state.pending = Some(TorrentAction::Remove { delete_data: true });
        assert_eq!(state.view_kind(), ViewKind::Confirm);
    }

    #[test]
    fn open_prompt_takes_the_prompt_keymap() {
        let mut state = AppState::default();
        state.prompt = Some(Prompt::new(prompt::PromptKind::Search, ""));
        assert_eq!(state.view_kind(), ViewKind::Prompt);
    }
}
