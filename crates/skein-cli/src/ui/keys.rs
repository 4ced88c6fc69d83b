//! Key map: translate a key press into an [`Intent`] for the active view.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use skein_content::PriorityStep;
use skein_torrent_core::TorrentAction;

use crate::app::{Intent, ViewKind};

const PAGE: isize = 10;

pub(crate) fn intent(view: ViewKind, key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }
    match view {
        ViewKind::Confirm => confirm(key),
        ViewKind::Prompt => prompt(key),
        ViewKind::List => list(key),
        ViewKind::Content => content(key),
        ViewKind::Trackers => trackers(key),
        ViewKind::Peers | ViewKind::Details => close_only(key),
    }
}

fn movement(code: KeyCode) -> Option<Intent> {
    let delta = match code {
        KeyCode::Up | KeyCode::Char('k') => -1,
        KeyCode::Down | KeyCode::Char('j') => 1,
        KeyCode::PageUp => -PAGE,
        KeyCode::PageDown => PAGE,
        KeyCode::Home => isize::MIN,
        KeyCode::End => isize::MAX,
        _ => return None,
    };
    Some(Intent::MoveCursor(delta))
}

fn list(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        let action = match key.code {
            KeyCode::Char('s') => TorrentAction::Start,
            KeyCode::Char('p') => TorrentAction::Stop,
            KeyCode::Char('r') => TorrentAction::Verify,
            KeyCode::Char('f') => TorrentAction::Reannounce,
            KeyCode::Char('a') => return Some(Intent::SelectAll(true)),
            KeyCode::Char('l') => return Some(Intent::StartRename),
            KeyCode::Char('n') => return Some(Intent::StartLabels),
            _ => return None,
        };
        return Some(Intent::Action(action));
    }
    match key.code {
        KeyCode::F(2) => Some(Intent::CycleStatusFilter),
        KeyCode::F(3) => Some(Intent::CycleCategory),
        KeyCode::F(4) => Some(Intent::OpenDetails),
        KeyCode::F(5) => Some(Intent::OpenTrackers),
        KeyCode::F(6) => Some(Intent::OpenPeers),
        KeyCode::F(7) | KeyCode::Char('/') => Some(Intent::StartSearch),
        KeyCode::F(8) | KeyCode::Enter => Some(Intent::OpenContent),
        KeyCode::F(9) => Some(Intent::StartMove),
        KeyCode::Char('r') => Some(Intent::Refresh),
        KeyCode::F(10) | KeyCode::Char('q') => Some(Intent::Quit),
        KeyCode::F(12) => Some(Intent::CycleSort),
        KeyCode::Char(' ') => Some(Intent::ToggleSelection),
        KeyCode::Esc => Some(Intent::SelectAll(false)),
        KeyCode::Delete => Some(Intent::RequestRemove { delete_data: false }),
        KeyCode::Char('~') => Some(Intent::RequestRemove { delete_data: true }),
        code => movement(code),
    }
}

fn content(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Intent::CloseView),
        KeyCode::F(3) => Some(Intent::NextDirectory { top_level: false }),
        KeyCode::F(4) => Some(Intent::NextDirectory { top_level: true }),
        KeyCode::Char(' ') => Some(Intent::ToggleWanted),
        KeyCode::Char('1') => Some(Intent::CyclePriority(PriorityStep::Lower)),
        KeyCode::Char('2') => Some(Intent::CyclePriority(PriorityStep::Raise)),
        code => movement(code),
    }
}

fn trackers(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('n')).then_some(Intent::StartAddTracker);
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Intent::CloseView),
        KeyCode::F(2) => Some(Intent::StartReplaceTracker),
        KeyCode::Delete => Some(Intent::RemoveTracker),
        code => movement(code),
    }
}

fn close_only(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Intent::CloseView),
        _ => None,
    }
}

/// Every printable key is text while a prompt is open.
fn prompt(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Esc => Some(Intent::PromptCancel),
        KeyCode::Enter => Some(Intent::PromptSubmit),
        KeyCode::Backspace => Some(Intent::PromptBackspace),
        KeyCode::F(3) => Some(Intent::SearchNext),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Intent::PromptInput(c))
        }
        _ => None,
    }
}

fn confirm(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Intent::Confirm(true)),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Intent::Confirm(false)),
        _ => None,
    }
}
