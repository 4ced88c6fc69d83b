//! Refresh coordinator: the single gate through which the poll task, the
//! peers task and user actions read and mutate [`AppState`].
//!
//! # Design
//! - One coarse async mutex, held for a whole read-or-mutate cycle including
//!   the daemon calls made under it. Lock order is always state first.
//! - Edits to the content tree are applied locally before the daemon is told;
//!   a failed call leaves the local state in place and shows a status message.
//! - The peers task lives only while the peers view is open and is stopped
//!   through a oneshot channel.
//! - Prompts only collect text; the daemon is called once on submit.

use std::sync::Arc;
use std::time::Duration;

use skein_content::{PriorityStep, SelectionChange};
use skein_torrent_core::{DaemonClient, TorrentAction, TorrentId, TorrentResult};
use tokio::sync::{Mutex, Notify, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::content::ContentView;
use super::prompt::{Prompt, PromptKind, parse_labels};
use super::trackers::TrackersView;
use super::{AppState, DetailsView, Intent, PeersView, View, ViewKind};

/// Whether the interactive loop keeps running after an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

struct PeersTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub(crate) struct Coordinator {
    daemon: Arc<dyn DaemonClient>,
    state: Arc<Mutex<AppState>>,
    redraw: Arc<Notify>,
    peers_interval: Duration,
    peers_task: Arc<Mutex<Option<PeersTask>>>,
}

/// Forward one tree edit to the daemon.
pub(crate) async fn send_change(
    daemon: &dyn DaemonClient,
    torrent: TorrentId,
    change: &SelectionChange,
) -> TorrentResult<()> {
    match change {
        SelectionChange::Wanted { leaves, wanted } => {
            daemon.set_files_wanted(torrent, leaves, *wanted).await
        }
        SelectionChange::Priority { leaves, priority } => {
            daemon.set_files_priority(torrent, leaves, *priority).await
        }
    }
}

impl Coordinator {
    pub(crate) fn new(daemon: Arc<dyn DaemonClient>, peers_interval: Duration) -> Self {
        Self {
            daemon,
            state: Arc::new(Mutex::new(AppState::default())),
            redraw: Arc::new(Notify::new()),
            peers_interval,
            peers_task: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn state(&self) -> &Mutex<AppState> {
        &self.state
    }

    /// Woken whenever a background task changed something on screen.
    pub(crate) fn redraw(&self) -> &Notify {
        &self.redraw
    }

    pub(crate) async fn view_kind(&self) -> ViewKind {
        self.state.lock().await.view_kind()
    }

    /// Fetch session stats and the torrent list.
    pub(crate) async fn refresh(&self) {
        let mut state = self.state.lock().await;
        self.reload_list(&mut state).await;
    }

    async fn reload_list(&self, state: &mut AppState) {
        let stats = self.daemon.session_stats().await;
        let torrents = self.daemon.list().await;
        state.apply_refresh(stats, torrents);
    }

    /// Poll on a fixed interval until the returned handle is aborted.
    pub(crate) fn spawn_poll(&self, interval: Duration) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                this.refresh().await;
                this.redraw.notify_one();
            }
        })
    }

    pub(crate) async fn dispatch(&self, intent: Intent) -> Flow {
        match intent {
            Intent::Quit => return Flow::Quit,
            Intent::Refresh => self.refresh().await,
            Intent::MoveCursor(delta) => {
                let mut guard = self.state.lock().await;
                let state = &mut *guard;
                match &mut state.view {
                    View::List => state.list.move_cursor(delta),
                    View::Content(view) => view.move_cursor(delta),
                    View::Trackers(view) => view.move_cursor(delta),
                    View::Peers(_) | View::Details(_) => {}
                }
            }
            Intent::ToggleSelection => self.state.lock().await.list.toggle_selected(),
            Intent::SelectAll(select) => self.state.lock().await.list.select_all(select),
            Intent::CycleSort => {
                let mut state = self.state.lock().await;
                let next = state.list.sort_key().next();
                state.list.set_sort(next);
                state.info(format!("sorted by {}", next.label()));
            }
            Intent::CycleStatusFilter => {
                let mut state = self.state.lock().await;
                let next = state.list.status_filter().next();
                state.list.set_status_filter(next);
            }
            Intent::CycleCategory => {
                let mut state = self.state.lock().await;
                let next = state.list.next_category();
                state.list.set_category_filter(next);
            }
            Intent::OpenContent => self.open_content().await,
            Intent::OpenPeers => self.open_peers().await,
            Intent::CloseView => self.close_view().await,
            Intent::Action(action) => self.perform(action).await,
            Intent::RequestRemove { delete_data } => {
                let mut state = self.state.lock().await;
                if !state.list.targets().is_empty() {
                    state.pending = Some(TorrentAction::Remove { delete_data });
                }
            }
            Intent::Confirm(accepted) => {
                let pending = self.state.lock().await.pending.take();
                if let (true, Some(action)) = (accepted, pending) {
                    self.perform(action).await;
                }
            }
            Intent::ToggleWanted => self.edit(ContentView::toggle_current).await,
            Intent::CyclePriority(step) => {
                self.edit(|view: &mut ContentView| view.cycle_current(step))
                    .await;
            }
            Intent::NextDirectory { top_level } => {
                if let View::Content(view) = &mut self.state.lock().await.view {
                    view.next_directory(top_level);
                }
            }
            Intent::OpenTrackers => self.open_trackers().await,
            Intent::OpenDetails => self.open_details().await,
            Intent::StartMove => self.start_move().await,
            Intent::StartSearch
            | Intent::StartRename
            | Intent::StartLabels
            | Intent::StartAddTracker
            | Intent::StartReplaceTracker => self.start_prompt(intent).await,
            Intent::RemoveTracker => self.remove_tracker().await,
            Intent::PromptInput(_) | Intent::PromptBackspace | Intent::SearchNext => {
                self.edit_prompt(intent).await;
            }
            Intent::PromptSubmit => self.submit_prompt().await,
            Intent::PromptCancel => self.state.lock().await.prompt = None,
        }
        Flow::Continue
    }

    async fn perform(&self, action: TorrentAction) {
        let mut state = self.state.lock().await;
        let targets = state.list.targets();
        if targets.is_empty() {
            return;
        }
        match self.daemon.perform(&targets, action).await {
            Ok(()) => {
                info!(action = action.verb(), count = targets.len(), "action applied");
                state.info(format!("{} sent to {} torrent(s)", action.verb(), targets.len()));
                if matches!(action, TorrentAction::Remove { .. }) {
                    state.list.select_all(false);
                }
                self.reload_list(&mut state).await;
            }
            Err(err) => state.record_failure(&err),
        }
    }

    /// Open the prompt `intent` asks for, prefilled from the focused row.
    async fn start_prompt(&self, intent: Intent) {
        let mut state = self.state.lock().await;
        let prompt = match (intent, &state.view) {
            (Intent::StartSearch, View::List) => Some(Prompt::new(PromptKind::Search, "")),
            (Intent::StartRename, View::List) => state.list.current().map(|t| {
                let kind = PromptKind::Rename {
                    torrent: t.id,
                    current: t.name.clone(),
                };
                Prompt::new(kind, t.name.clone())
            }),
            (Intent::StartLabels, View::List) => state.list.current().map(|t| {
                let kind = PromptKind::Labels {
                    targets: state.list.targets(),
                };
                Prompt::new(kind, t.labels.join(","))
            }),
            (Intent::StartAddTracker, View::Trackers(view)) => Some(Prompt::new(
                PromptKind::AddTracker {
                    torrent: view.torrent,
                },
                "",
            )),
            (Intent::StartReplaceTracker, View::Trackers(view)) => view.current().map(|t| {
                let kind = PromptKind::ReplaceTracker {
                    torrent: view.torrent,
                    tracker_id: t.id,
                };
                Prompt::new(kind, t.announce.clone())
            }),
            _ => None,
        };
        if prompt.is_some() {
            state.prompt = prompt;
        }
    }

    async fn edit_prompt(&self, intent: Intent) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(prompt) = &mut state.prompt else {
            return;
        };
        match intent {
            Intent::PromptInput(c) => prompt.push(c),
            Intent::PromptBackspace => prompt.backspace(),
            Intent::SearchNext if prompt.kind == PromptKind::Search => {
                let needle = prompt.input().to_string();
                search(state, &needle, true);
            }
            _ => {}
        }
    }

    async fn start_move(&self) {
        let mut state = self.state.lock().await;
        let targets = state.list.targets();
        let Some(directory) = state
            .list
            .current()
            .map(|t| t.download_dir.clone().unwrap_or_default())
        else {
            return;
        };
        let free_space = self.free_space(&directory).await;
        state.prompt = Some(Prompt::new(
            PromptKind::Move {
                targets,
                free_space,
            },
            directory,
        ));
    }

    /// Free space is informational; failures are logged and hidden.
    async fn free_space(&self, directory: &str) -> Option<u64> {
        if directory.is_empty() {
            return None;
        }
        match self.daemon.free_space(directory).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                debug!(directory, error = %err.describe(), "free space unavailable");
                None
            }
        }
    }

    async fn submit_prompt(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(prompt) = state.prompt.take() else {
            return;
        };
        let text = prompt.input().trim().to_string();
        let outcome = match prompt.kind {
            PromptKind::Search => {
                search(state, &text, false);
                return;
            }
            PromptKind::Move { targets, .. } => {
                if text.is_empty() {
                    return;
                }
                self.daemon
                    .set_location(&targets, &text, true)
                    .await
                    .map(|()| format!("moving {} torrent(s) to {text}", targets.len()))
            }
            PromptKind::Rename { torrent, current } => {
                if text.is_empty() || text == current {
                    return;
                }
                self.daemon
                    .rename_path(torrent, &current, &text)
                    .await
                    .map(|()| format!("renamed {current} to {text}"))
            }
            PromptKind::Labels { targets } => {
                let labels = parse_labels(&text);
                let outcome = self
                    .daemon
                    .set_labels(&targets, &labels)
                    .await
                    .map(|()| format!("labels set on {} torrent(s)", targets.len()));
                if outcome.is_ok() {
                    state.list.select_all(false);
                }
                outcome
            }
            PromptKind::AddTracker { torrent } => {
                if text.is_empty() {
                    return;
                }
                let outcome = self
                    .daemon
                    .add_tracker(torrent, &text)
                    .await
                    .map(|()| format!("tracker {text} added"));
                return self.finish_tracker_edit(state, torrent, outcome).await;
            }
            PromptKind::ReplaceTracker {
                torrent,
                tracker_id,
            } => {
                if text.is_empty() {
                    return;
                }
                let outcome = self
                    .daemon
                    .replace_tracker(torrent, tracker_id, &text)
                    .await
                    .map(|()| format!("tracker changed to {text}"));
                return self.finish_tracker_edit(state, torrent, outcome).await;
            }
        };
        match outcome {
            Ok(message) => {
                info!(%message, "torrent updated");
                state.info(message);
                self.reload_list(state).await;
            }
            Err(err) => state.record_failure(&err),
        }
    }

    async fn open_trackers(&self) {
        let mut state = self.state.lock().await;
        let Some((torrent, name)) = state.list.current().map(|t| (t.id, t.name.clone())) else {
            return;
        };
        match self.daemon.trackers(torrent).await {
            Ok(trackers) => {
                debug!(torrent_id = %torrent, trackers = trackers.len(), "trackers opened");
                state.view = View::Trackers(TrackersView::new(torrent, name, trackers));
            }
            Err(err) => state.record_failure(&err),
        }
    }

    async fn remove_tracker(&self) {
        let mut state = self.state.lock().await;
        let View::Trackers(view) = &state.view else {
            return;
        };
        let torrent = view.torrent;
        let Some(tracker) = view.current() else {
            return;
        };
        let announce = tracker.announce.clone();
        let outcome = self
            .daemon
            .remove_tracker(torrent, tracker.id)
            .await
            .map(|()| format!("tracker {announce} removed"));
        self.finish_tracker_edit(&mut state, torrent, outcome).await;
    }

    /// Report a tracker edit and re-read the trackers view.
    async fn finish_tracker_edit(
        &self,
        state: &mut AppState,
        torrent: TorrentId,
        outcome: TorrentResult<String>,
    ) {
        match outcome {
            Ok(message) => {
                info!(torrent_id = %torrent, %message, "trackers updated");
                state.info(message);
            }
            Err(err) => {
                state.record_failure(&err);
                return;
            }
        }
        match self.daemon.trackers(torrent).await {
            Ok(trackers) => {
                if let View::Trackers(view) = &mut state.view
                    && view.torrent == torrent
                {
                    view.replace(trackers);
                }
            }
            Err(err) => state.record_failure(&err),
        }
    }

    async fn open_details(&self) {
        let mut state = self.state.lock().await;
        let Some(torrent) = state.list.current().map(|t| t.id) else {
            return;
        };
        match self.daemon.details(torrent).await {
            Ok(details) => {
                let free_space = self.free_space(&details.download_dir).await;
                state.view = View::Details(DetailsView {
                    details,
                    free_space,
                });
            }
            Err(err) => state.record_failure(&err),
        }
    }

    async fn open_content(&self) {
        let mut state = self.state.lock().await;
        let Some((torrent, name)) = state.list.current().map(|t| (t.id, t.name.clone())) else {
            return;
        };
        match self.daemon.content(torrent).await {
            Ok(listing) => {
                debug!(torrent_id = %torrent, files = listing.leaves.len(), "content opened");
                state.view = View::Content(ContentView::new(torrent, name, listing));
            }
            Err(err) => state.record_failure(&err),
        }
    }

    /// Apply a tree edit locally, then send the resulting change.
    async fn edit(&self, apply: impl FnOnce(&mut ContentView) -> Option<SelectionChange>) {
        let mut state = self.state.lock().await;
        let View::Content(view) = &mut state.view else {
            return;
        };
        let Some(change) = apply(view) else {
            return;
        };
        let torrent = view.torrent;
        debug!(torrent_id = %torrent, files = change.leaves().len(), "sending selection change");
        if let Err(err) = send_change(self.daemon.as_ref(), torrent, &change).await {
            state.record_failure(&err);
        }
    }

    async fn open_peers(&self) {
        let torrent = {
            let mut state = self.state.lock().await;
            let Some((torrent, name)) = state.list.current().map(|t| (t.id, t.name.clone()))
            else {
                return;
            };
            state.view = View::Peers(PeersView {
                torrent,
                name,
                peers: Vec::new(),
            });
            torrent
        };
        self.stop_peers().await;
        let (stop, stopped) = oneshot::channel();
        let handle = tokio::spawn(peers_loop(self.clone(), torrent, stopped));
        *self.peers_task.lock().await = Some(PeersTask { stop, handle });
    }

    async fn close_view(&self) {
        let previous = std::mem::take(&mut self.state.lock().await.view);
        if matches!(previous, View::Peers(_)) {
            self.stop_peers().await;
        }
    }

    /// Stop the peers task, if one is running, and wait for it to finish.
    pub(crate) async fn stop_peers(&self) {
        let task = self.peers_task.lock().await.take();
        if let Some(PeersTask { stop, handle }) = task {
            let _ = stop.send(());
            if let Err(err) = handle.await {
                warn!(error = %err, "peers task ended abnormally");
            }
        }
    }
}

fn search(state: &mut AppState, needle: &str, skip_current: bool) {
    if !needle.is_empty() && !state.list.search(needle, skip_current) {
        state.info(format!("no torrent matches '{needle}'"));
    }
}

async fn peers_loop(coordinator: Coordinator, torrent: TorrentId, mut stopped: oneshot::Receiver<()>) {
    let mut ticker = tokio::time::interval(coordinator.peers_interval);
    loop {
        tokio::select! {
            _ = &mut stopped => break,
            _ = ticker.tick() => {
                let mut state = coordinator.state.lock().await;
                let stats = coordinator.daemon.session_stats().await;
                let peers = coordinator.daemon.peers(torrent).await;
                state.apply_peers(torrent, stats, peers);
                drop(state);
                coordinator.redraw.notify_one();
            }
        }
    }
    debug!(torrent_id = %torrent, "peers refresh stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_content::WantedState;
    use skein_test_support::fixtures::{sample_leaves, summary};
    use skein_test_support::mocks::{FakeDaemon, RecordedCall};
    use skein_torrent_core::{
        ContentListing, FilePriority, LeafId, PeerInfo, SessionStats, TorrentDetails,
        TorrentSummary, TrackerInfo,
    };

    async fn seeded() -> (Arc<FakeDaemon>, Coordinator) {
        let daemon = Arc::new(FakeDaemon::new());
        daemon
            .set_torrents(vec![summary(1, "alpha"), summary(2, "beta")])
            .await;
        daemon
            .set_content(
                TorrentId(1),
                ContentListing {
                    base_path: "/srv".into(),
                    leaves: sample_leaves(),
                },
            )
            .await;
        let coordinator = Coordinator::new(daemon.clone(), Duration::from_millis(10));
        coordinator.refresh().await;
        (daemon, coordinator)
    }

    async fn focus(coordinator: &Coordinator, id: i64) {
        let mut state = coordinator.state().lock().await;
        let position = state
            .list
            .visible()
            .iter()
            .position(|t| t.id == TorrentId(id))
            .expect("torrent listed");
        let delta = isize::try_from(position).expect("small index")
            - isize::try_from(state.list.cursor()).expect("small index");
        state.list.move_cursor(delta);
    }

    async fn select_row(coordinator: &Coordinator, path: &[&str]) {
        let mut state = coordinator.state().lock().await;
        let View::Content(view) = &mut state.view else {
            panic!("content view expected");
        };
        let target = view.tree.find(path).expect("path exists");
        let row = view
            .rows()
            .iter()
            .position(|row| row.id == target)
            .expect("row exists");
        let delta = isize::try_from(row).expect("small index")
            - isize::try_from(view.cursor()).expect("small index");
        view.move_cursor(delta);
    }

    async fn type_text(coordinator: &Coordinator, text: &str) {
        for c in text.chars() {
            coordinator.dispatch(Intent::PromptInput(c)).await;
        }
    }

    async fn clear_input(coordinator: &Coordinator) {
        let length = coordinator
            .state()
            .lock()
            .await
            .prompt
            .as_ref()
            .map_or(0, |prompt| prompt.input().chars().count());
        for _ in 0..length {
            coordinator.dispatch(Intent::PromptBackspace).await;
        }
    }

    async fn status_text(coordinator: &Coordinator) -> Option<String> {
        let state = coordinator.state().lock().await;
        state.status.as_ref().map(|s| s.text.clone())
    }

    fn tracker(id: i64, announce: &str) -> TrackerInfo {
        TrackerInfo {
            id,
            announce: announce.into(),
            ..TrackerInfo::default()
        }
    }

    #[tokio::test]
    async fn refresh_loads_list_and_stats() -> anyhow::Result<()> {
        let daemon = Arc::new(FakeDaemon::new());
        daemon.set_torrents(vec![summary(1, "alpha")]).await;
        daemon
            .set_stats(SessionStats {
                torrent_count: 1,
                ..SessionStats::default()
            })
            .await;
        let coordinator = Coordinator::new(daemon, Duration::from_secs(1));
        coordinator.refresh().await;
        let state = coordinator.state().lock().await;
        assert_eq!(state.list.len(), 1);
        assert_eq!(state.stats.torrent_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn toggling_sends_only_changed_files() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::OpenContent).await;
        assert_eq!(coordinator.view_kind().await, ViewKind::Content);

        select_row(&coordinator, &["a", "b"]).await;
        coordinator.dispatch(Intent::ToggleWanted).await;

        assert_eq!(
            daemon.calls().await,
            vec![RecordedCall::SetWanted {
                id: TorrentId(1),
                files: vec![LeafId(1)],
                wanted: true,
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn priority_steps_reach_the_daemon() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::OpenContent).await;
        select_row(&coordinator, &["a"]).await;

        coordinator
            .dispatch(Intent::CyclePriority(PriorityStep::Raise))
            .await;
        coordinator
            .dispatch(Intent::CyclePriority(PriorityStep::Raise))
            .await;
        coordinator
            .dispatch(Intent::CyclePriority(PriorityStep::Raise))
            .await;

        let calls = daemon.calls().await;
        assert_eq!(calls.len(), 1, "saturated raise sends nothing");
        assert_eq!(
            calls[0],
            RecordedCall::SetPriority {
                id: TorrentId(1),
                files: vec![LeafId(0), LeafId(1), LeafId(2)],
                priority: FilePriority::High,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn failed_send_keeps_local_edit_and_reports() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::OpenContent).await;
        select_row(&coordinator, &["a"]).await;
        daemon.fail_next(Some("connection reset")).await;

        coordinator.dispatch(Intent::ToggleWanted).await;

        let state = coordinator.state().lock().await;
        let View::Content(view) = &state.view else {
            panic!("content view expected");
        };
        let a = view.tree.find(&["a"]).expect("a exists");
        assert_eq!(view.tree[a].wanted_state(), WantedState::Wanted);
        let status = state.status.as_ref().map(|s| s.text.clone());
        assert_eq!(
            status.as_deref(),
            Some("torrent.files_wanted: connection reset")
        );
        Ok(())
    }

    #[tokio::test]
    async fn actions_target_selection_and_remove_needs_confirmation() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        coordinator.dispatch(Intent::SelectAll(true)).await;
        coordinator
            .dispatch(Intent::Action(TorrentAction::Stop))
            .await;

        coordinator
            .dispatch(Intent::RequestRemove { delete_data: true })
            .await;
        assert_eq!(coordinator.view_kind().await, ViewKind::Confirm);
        coordinator.dispatch(Intent::Confirm(false)).await;
        assert_eq!(coordinator.view_kind().await, ViewKind::List);

        coordinator
            .dispatch(Intent::RequestRemove { delete_data: true })
            .await;
        coordinator.dispatch(Intent::Confirm(true)).await;

        let both = vec![TorrentId(1), TorrentId(2)];
        assert_eq!(
            daemon.calls().await,
            vec![
                RecordedCall::Perform {
                    ids: both.clone(),
                    action: TorrentAction::Stop,
                },
                RecordedCall::Perform {
                    ids: both,
                    action: TorrentAction::Remove { delete_data: true },
                },
            ]
        );
        assert_eq!(coordinator.state().lock().await.list.selection_len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_content_fetch_stays_on_list() -> anyhow::Result<()> {
        let (_daemon, coordinator) = seeded().await;
        focus(&coordinator, 2).await;
        coordinator.dispatch(Intent::OpenContent).await;
        let state = coordinator.state().lock().await;
        assert!(matches!(state.view, View::List));
        assert_eq!(
            state.status.as_ref().map(|s| s.text.as_str()),
            Some("torrent 2 not found")
        );
        Ok(())
    }

    #[tokio::test]
    async fn peers_task_runs_only_while_view_is_open() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        daemon
            .set_peers(
                TorrentId(1),
                vec![PeerInfo {
                    address: "10.0.0.2".into(),
                    ..PeerInfo::default()
                }],
            )
            .await;
        focus(&coordinator, 1).await;

        coordinator.dispatch(Intent::OpenPeers).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        {
            let state = coordinator.state().lock().await;
            let View::Peers(view) = &state.view else {
                panic!("peers view expected");
            };
            assert_eq!(view.peers.len(), 1);
        }

        coordinator.dispatch(Intent::CloseView).await;
        let reads_after_close = daemon.reads().await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(daemon.reads().await, reads_after_close);
        assert_eq!(coordinator.view_kind().await, ViewKind::List);
        Ok(())
    }

    #[tokio::test]
    async fn tracker_edits_reach_the_daemon_and_reload_the_view() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        daemon
            .set_trackers(
                TorrentId(1),
                vec![tracker(0, "udp://one.example:6969"), tracker(1, "udp://two.example:6969")],
            )
            .await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::OpenTrackers).await;
        assert_eq!(coordinator.view_kind().await, ViewKind::Trackers);

        coordinator.dispatch(Intent::StartAddTracker).await;
        assert_eq!(coordinator.view_kind().await, ViewKind::Prompt);
        type_text(&coordinator, "udp://three.example:1337").await;
        coordinator.dispatch(Intent::PromptSubmit).await;
        assert_eq!(coordinator.view_kind().await, ViewKind::Trackers);

        coordinator.dispatch(Intent::MoveCursor(1)).await;
        coordinator.dispatch(Intent::StartReplaceTracker).await;
        clear_input(&coordinator).await;
        type_text(&coordinator, "udp://moved.example:6969").await;
        coordinator.dispatch(Intent::PromptSubmit).await;

        coordinator.dispatch(Intent::MoveCursor(-1)).await;
        coordinator.dispatch(Intent::RemoveTracker).await;

        assert_eq!(
            daemon.calls().await,
            vec![
                RecordedCall::AddTracker {
                    id: TorrentId(1),
                    announce: "udp://three.example:1337".into(),
                },
                RecordedCall::ReplaceTracker {
                    id: TorrentId(1),
                    tracker_id: 1,
                    announce: "udp://moved.example:6969".into(),
                },
                RecordedCall::RemoveTracker {
                    id: TorrentId(1),
                    tracker_id: 0,
                },
            ]
        );
        assert_eq!(
            status_text(&coordinator).await.as_deref(),
            Some("tracker udp://one.example:6969 removed")
        );

        daemon
            .set_trackers(TorrentId(1), vec![tracker(1, "udp://moved.example:6969")])
            .await;
        coordinator.dispatch(Intent::StartAddTracker).await;
        type_text(&coordinator, "udp://four.example").await;
        coordinator.dispatch(Intent::PromptSubmit).await;
        let state = coordinator.state().lock().await;
        let View::Trackers(view) = &state.view else {
            panic!("trackers view expected");
        };
        assert_eq!(view.trackers().len(), 1, "view re-read after the edit");
        Ok(())
    }

    #[tokio::test]
    async fn blank_or_cancelled_prompts_send_nothing() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        daemon
            .set_trackers(TorrentId(1), vec![tracker(0, "udp://one.example")])
            .await;
        focus(&coordinator, 1).await;

        coordinator.dispatch(Intent::StartRename).await;
        coordinator.dispatch(Intent::PromptSubmit).await;
        coordinator.dispatch(Intent::StartMove).await;
        coordinator.dispatch(Intent::PromptSubmit).await;
        coordinator.dispatch(Intent::StartRename).await;
        type_text(&coordinator, "-copy").await;
        coordinator.dispatch(Intent::PromptCancel).await;
        coordinator.dispatch(Intent::OpenTrackers).await;
        coordinator.dispatch(Intent::StartAddTracker).await;
        type_text(&coordinator, "   ").await;
        coordinator.dispatch(Intent::PromptSubmit).await;

        assert!(daemon.calls().await.is_empty());
        assert_eq!(coordinator.view_kind().await, ViewKind::Trackers);
        Ok(())
    }

    #[tokio::test]
    async fn move_prompt_starts_at_current_directory_with_free_space() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        daemon
            .set_torrents(vec![TorrentSummary {
                download_dir: Some("/srv".into()),
                ..summary(1, "alpha")
            }])
            .await;
        daemon.set_free_space("/srv", 5_000_000).await;
        coordinator.refresh().await;

        coordinator.dispatch(Intent::StartMove).await;
        {
            let state = coordinator.state().lock().await;
            let prompt = state.prompt.as_ref().expect("move prompt open");
            assert_eq!(prompt.input(), "/srv");
            assert_eq!(
                prompt.kind,
                PromptKind::Move {
                    targets: vec![TorrentId(1)],
                    free_space: Some(5_000_000),
                }
            );
        }
        clear_input(&coordinator).await;
        type_text(&coordinator, "/archive").await;
        coordinator.dispatch(Intent::PromptSubmit).await;

        assert_eq!(
            daemon.calls().await,
            vec![RecordedCall::SetLocation {
                ids: vec![TorrentId(1)],
                location: "/archive".into(),
                move_data: true,
            }]
        );
        assert_eq!(
            status_text(&coordinator).await.as_deref(),
            Some("moving 1 torrent(s) to /archive")
        );
        assert_eq!(coordinator.view_kind().await, ViewKind::List);
        Ok(())
    }

    #[tokio::test]
    async fn rename_and_labels_prompts_reach_the_daemon() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::StartRename).await;
        type_text(&coordinator, "-v2").await;
        coordinator.dispatch(Intent::PromptSubmit).await;

        coordinator.dispatch(Intent::SelectAll(true)).await;
        coordinator.dispatch(Intent::StartLabels).await;
        type_text(&coordinator, "iso, linux,").await;
        coordinator.dispatch(Intent::PromptSubmit).await;

        assert_eq!(
            daemon.calls().await,
            vec![
                RecordedCall::RenamePath {
                    id: TorrentId(1),
                    path: "alpha".into(),
                    name: "alpha-v2".into(),
                },
                RecordedCall::SetLabels {
                    ids: vec![TorrentId(1), TorrentId(2)],
                    labels: vec!["iso".into(), "linux".into()],
                },
            ]
        );
        assert_eq!(coordinator.state().lock().await.list.selection_len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_rename_reports_and_closes_prompt() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::StartRename).await;
        type_text(&coordinator, "-v2").await;
        daemon.fail_next(Some("permission denied")).await;
        coordinator.dispatch(Intent::PromptSubmit).await;

        assert_eq!(coordinator.view_kind().await, ViewKind::List);
        assert_eq!(
            status_text(&coordinator).await.as_deref(),
            Some("torrent.rename: permission denied")
        );
        Ok(())
    }

    #[tokio::test]
    async fn search_moves_cursor_and_reports_misses() -> anyhow::Result<()> {
        let (_daemon, coordinator) = seeded().await;
        focus(&coordinator, 2).await;

        coordinator.dispatch(Intent::StartSearch).await;
        type_text(&coordinator, "A").await;
        coordinator.dispatch(Intent::SearchNext).await;
        {
            let state = coordinator.state().lock().await;
            assert_eq!(state.list.current().map(|t| t.id), Some(TorrentId(1)));
            assert!(state.prompt.is_some(), "next keeps the prompt open");
        }
        coordinator.dispatch(Intent::PromptCancel).await;

        coordinator.dispatch(Intent::StartSearch).await;
        type_text(&coordinator, "BET").await;
        coordinator.dispatch(Intent::PromptSubmit).await;
        assert_eq!(
            coordinator
                .state()
                .lock()
                .await
                .list
                .current()
                .map(|t| t.id),
            Some(TorrentId(2))
        );

        coordinator.dispatch(Intent::StartSearch).await;
        type_text(&coordinator, "zeta").await;
        coordinator.dispatch(Intent::PromptSubmit).await;
        assert_eq!(
            status_text(&coordinator).await.as_deref(),
            Some("no torrent matches 'zeta'")
        );
        assert_eq!(coordinator.view_kind().await, ViewKind::List);
        Ok(())
    }

    #[tokio::test]
    async fn details_view_carries_free_space_of_its_directory() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        daemon
            .set_details(
                TorrentId(1),
                TorrentDetails {
                    id: TorrentId(1),
                    name: "alpha".into(),
                    download_dir: "/srv".into(),
                    ..TorrentDetails::default()
                },
            )
            .await;
        daemon.set_free_space("/srv", 1_024).await;
        focus(&coordinator, 1).await;
        coordinator.dispatch(Intent::OpenDetails).await;
        {
            let state = coordinator.state().lock().await;
            let View::Details(view) = &state.view else {
                panic!("details view expected");
            };
            assert_eq!(view.details.name, "alpha");
            assert_eq!(view.free_space, Some(1_024));
        }
        coordinator.dispatch(Intent::CloseView).await;

        focus(&coordinator, 2).await;
        coordinator.dispatch(Intent::OpenDetails).await;
        assert_eq!(coordinator.view_kind().await, ViewKind::List);
        assert_eq!(
            status_text(&coordinator).await.as_deref(),
            Some("torrent 2 not found")
        );
        Ok(())
    }

    #[tokio::test]
    async fn poll_task_refreshes_until_aborted() -> anyhow::Result<()> {
        let (daemon, coordinator) = seeded().await;
        daemon
            .set_torrents(vec![summary(1, "alpha"), summary(2, "beta"), summary(3, "gamma")])
            .await;
        let poll = coordinator.spawn_poll(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        poll.abort();
        assert_eq!(coordinator.state().lock().await.list.len(), 3);
        Ok(())
    }
}
