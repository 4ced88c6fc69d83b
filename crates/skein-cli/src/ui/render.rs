//! Drawing: every frame is rendered from an [`AppState`] snapshot.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use skein_content::WantedState;
use skein_torrent_core::{SessionStats, TorrentAction};

use crate::app::content::ContentView;
use crate::app::list::TorrentList;
use crate::app::prompt::{Prompt, PromptKind};
use crate::app::trackers::TrackersView;
use crate::app::{AppState, DetailsView, PeersView, StatusLevel, View};
use crate::output::{
    format_date, format_eta, format_progress, format_size, format_speed, indent, node_label,
    status_label,
};

const LIST_HINTS: &str = "F2 status  F3 label  F4 info  F5 trackers  F6 peers  F7 search  F8 files  F9 move  F12 sort  ^S start  ^P stop  ^R verify  ^F announce  ^L rename  ^N labels  Del remove  F10 quit";
const CONTENT_HINTS: &str = "Space toggle  1 lower  2 raise  F3 next dir  F4 next top dir  Esc back";
const TRACKERS_HINTS: &str = "^N add  F2 edit URL  Del remove  Esc back";
const BACK_HINTS: &str = "Esc back";

pub(crate) fn draw(frame: &mut Frame<'_>, state: &AppState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match &state.view {
        View::List => {
            draw_header(frame, header, &list_header(&state.list));
            draw_list(frame, body, &state.list);
        }
        View::Content(view) => {
            draw_header(frame, header, CONTENT_HINTS);
            draw_content(frame, body, view);
        }
        View::Peers(view) => {
            draw_header(frame, header, BACK_HINTS);
            draw_peers(frame, body, view);
        }
        View::Trackers(view) => {
            draw_header(frame, header, TRACKERS_HINTS);
            draw_trackers(frame, body, view);
        }
        View::Details(view) => {
            draw_header(frame, header, BACK_HINTS);
            draw_details(frame, body, view);
        }
    }
    match &state.prompt {
        Some(prompt) => draw_prompt(frame, footer, prompt),
        None => draw_status(frame, footer, state),
    }

    if let Some(action) = state.pending {
        draw_confirm(frame, action, state.list.targets().len());
    }
}

fn list_header(list: &TorrentList) -> String {
    format!(
        "{LIST_HINTS} | sort: {} | status: {} | label: {}",
        list.sort_key().label(),
        list.status_filter().label(),
        list.category_filter().label()
    )
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, text: &str) {
    let style = Style::default().fg(Color::Black).bg(Color::Cyan);
    frame.render_widget(Paragraph::new(text.to_string()).style(style), area);
}

fn draw_list(frame: &mut Frame<'_>, area: Rect, list: &TorrentList) {
    let header = Row::new(["", "Name", "Status", "Done", "Size", "Down", "Up", "ETA", "Added"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = list.visible().into_iter().map(|torrent| {
        let mark = if list.is_selected(torrent.id) { "*" } else { "" };
        let status_style = if torrent.has_error() {
            Style::default().fg(Color::Red)
        } else if torrent.is_active() {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Row::new([
            Cell::from(mark),
            Cell::from(torrent.name.clone()),
            Cell::from(status_label(torrent)).style(status_style),
            Cell::from(format_progress(torrent.percent_done)),
            Cell::from(format_size(torrent.size_when_done)),
            Cell::from(format_speed(torrent.download_bps)),
            Cell::from(format_speed(torrent.upload_bps)),
            Cell::from(format_eta(torrent.eta_seconds)),
            Cell::from(format_date(torrent.added_at)),
        ])
    });
    let widths = [
        Constraint::Length(1),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(19),
    ];
    let mut title = format!(" Torrents ({}/{}", list.visible().len(), list.len());
    if list.selection_len() > 0 {
        title.push_str(&format!(", {} selected", list.selection_len()));
    }
    title.push_str(") ");
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut table_state = TableState::default().with_selected(list.current().map(|_| list.cursor()));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn wanted_style(state: WantedState) -> Style {
    match state {
        WantedState::Wanted => Style::default(),
        WantedState::Unwanted => Style::default().fg(Color::DarkGray),
        WantedState::Mixed => Style::default().fg(Color::Yellow),
    }
}

fn draw_content(frame: &mut Frame<'_>, area: Rect, view: &ContentView) {
    let rows = view.rows().iter().map(|row| {
        let node = &view.tree[row.id];
        Row::new([
            Cell::from(node.wanted_state().marker()),
            Cell::from(node.priority_state().as_str()),
            Cell::from(format_progress(node.progress())),
            Cell::from(format_size(node.size())),
            Cell::from(format!("{}{}", indent(row.depth), node_label(&view.tree, row.id))),
        ])
        .style(wanted_style(node.wanted_state()))
    });
    let widths = [
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Min(20),
    ];
    let title = format!(" {} - {} ", view.name, view.base_path);
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut table_state = TableState::default().with_selected(view.current().map(|_| view.cursor()));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_peers(frame: &mut Frame<'_>, area: Rect, view: &PeersView) {
    let header = Row::new(["Address", "Client", "Flags", "Done", "Down", "Up"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.peers.iter().map(|peer| {
        Row::new([
            peer.address.clone(),
            peer.client_name.clone(),
            peer.flags.clone(),
            format_progress(peer.progress),
            format_speed(peer.download_bps),
            format_speed(peer.upload_bps),
        ])
    });
    let widths = [
        Constraint::Length(40),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let title = format!(" Peers of {} ({}) ", view.name, view.peers.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

/// Blank for counts the tracker never reported.
fn count(value: Option<u32>) -> String {
    value.map(|count| count.to_string()).unwrap_or_default()
}

fn draw_trackers(frame: &mut Frame<'_>, area: Rect, view: &TrackersView) {
    let header = Row::new(["URL", "Peers", "Seeds", "Last announce"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.trackers().iter().map(|tracker| {
        Row::new([
            tracker.announce.clone(),
            count(tracker.last_announce_peer_count),
            count(tracker.seeder_count),
            tracker.last_announce_result.clone(),
        ])
    });
    let widths = [
        Constraint::Min(30),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(30),
    ];
    let title = format!(" Trackers of {} ({}) ", view.name, view.trackers().len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut table_state =
        TableState::default().with_selected(view.current().map(|_| view.cursor()));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn details_lines(view: &DetailsView) -> Vec<(&'static str, String)> {
    let details = &view.details;
    vec![
        ("Name", details.name.clone()),
        ("ID", details.id.to_string()),
        ("Hash", details.hash.clone()),
        ("Labels", details.labels.join(",")),
        ("Location", details.download_dir.clone()),
        ("Free space", view.free_space.map(format_size).unwrap_or_default()),
        ("Comment", details.comment.clone()),
        ("Uploaded", format_size(details.uploaded_bytes)),
        (
            "Ratio",
            details
                .upload_ratio
                .map(|ratio| format!("{ratio:.2}"))
                .unwrap_or_default(),
        ),
        ("Created", format_date(details.created_at)),
        ("Creator", details.creator.clone()),
        ("Added", format_date(details.added_at)),
        ("Total size", format_size(details.total_size)),
        ("Errors", details.error_message.clone().unwrap_or_default()),
    ]
}

fn draw_details(frame: &mut Frame<'_>, area: Rect, view: &DetailsView) {
    let label_style = Style::default().add_modifier(Modifier::BOLD);
    let lines: Vec<Line<'_>> = details_lines(view)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:>10}: "), label_style),
                Span::raw(value),
            ])
        })
        .collect();
    let title = format!(" {} ", view.details.name);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_prompt(frame: &mut Frame<'_>, area: Rect, prompt: &Prompt) {
    let hints = if prompt.kind == PromptKind::Search {
        "Esc cancel  Enter find  F3 next"
    } else {
        "Esc cancel  Enter ok"
    };
    let text = format!("{hints} | {}: {}", prompt.label(), prompt.input());
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
        area,
    );
    frame.set_cursor_position(Position::new(
        area.x.saturating_add(width).min(area.right().saturating_sub(1)),
        area.y,
    ));
}

fn session_line(stats: &SessionStats) -> String {
    format!(
        "All: {} | Resumed: {} | Paused: {} | Downloading: {} | Uploading: {}",
        stats.torrent_count,
        stats.active_torrent_count,
        stats.paused_torrent_count,
        format_speed(stats.download_bps),
        format_speed(stats.upload_bps)
    )
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let mut spans = vec![Span::raw(session_line(&state.stats))];
    if let Some(message) = &state.status {
        let style = match message.level {
            StatusLevel::Info => Style::default().fg(Color::Green),
            StatusLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(message.text.clone(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_confirm(frame: &mut Frame<'_>, action: TorrentAction, count: usize) {
    let area = centered(50, 5, frame.area());
    let text = vec![
        Line::from(format!("{} {count} torrent(s)?", action.verb())),
        Line::from("y / Enter: confirm    n / Esc: cancel"),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .border_style(Style::default().fg(Color::Red)),
        ),
        area,
    );
}
