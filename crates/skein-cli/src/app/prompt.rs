//! One-line text input shown over the current view.

use skein_torrent_core::TorrentId;

use crate::output::format_size;

/// What the typed text is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PromptKind {
    /// Find a torrent by name.
    Search,
    /// New download directory; data moves with it.
    Move {
        targets: Vec<TorrentId>,
        /// Space left in the current directory, when the daemon reported it.
        free_space: Option<u64>,
    },
    /// New name for the torrent's top-level file or directory.
    Rename { torrent: TorrentId, current: String },
    /// Comma-separated labels replacing the current ones.
    Labels { targets: Vec<TorrentId> },
    AddTracker { torrent: TorrentId },
    ReplaceTracker { torrent: TorrentId, tracker_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Prompt {
    pub(crate) kind: PromptKind,
    input: String,
}

impl Prompt {
    pub(crate) fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        Self {
            kind,
            input: initial.into(),
        }
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn push(&mut self, c: char) {
        self.input.push(c);
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    pub(crate) fn label(&self) -> String {
        match &self.kind {
            PromptKind::Search => "Search".to_string(),
            PromptKind::Move {
                free_space: Some(bytes),
                ..
            } => format!("Move to ({} free)", format_size(*bytes)),
            PromptKind::Move { .. } => "Move to".to_string(),
            PromptKind::Rename { .. } => "Rename to".to_string(),
            PromptKind::Labels { .. } => "Labels (comma separated)".to_string(),
            PromptKind::AddTracker { .. } => "Announce URL".to_string(),
            PromptKind::ReplaceTracker { .. } => "Tracker URL".to_string(),
        }
    }
}

/// Split comma-separated labels, dropping blanks.
pub(crate) fn parse_labels(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
