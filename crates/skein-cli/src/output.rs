//! Output renderers and formatting helpers shared by the subcommands and the UI.

use anyhow::anyhow;
use chrono::DateTime;
use clap::ValueEnum;
use serde::Serialize;
use skein_content::{ContentTree, NodeId};
use skein_torrent_core::TorrentSummary;

use crate::client::{CliError, CliResult};

/// Rendering mode for commands that print structured data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const SPEED_KB: f64 = 1000.0;

#[allow(clippy::cast_precision_loss)]
const fn to_f64(value: u64) -> f64 {
    value as f64
}

/// Two or three significant digits, matching the width of the list columns.
fn scaled(value: f64) -> String {
    if value >= 100.0 {
        format!("{value:.0}")
    } else if value >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn format_size(bytes: u64) -> String {
    let value = to_f64(bytes);
    if value >= GIB {
        format!("{} GiB", scaled(value / GIB))
    } else if value >= MIB {
        format!("{} MiB", scaled(value / MIB))
    } else if value >= KIB {
        format!("{} KiB", scaled(value / KIB))
    } else {
        format!("{bytes} B")
    }
}

/// Blank for an idle transfer so quiet rows stay uncluttered.
pub(crate) fn format_speed(bps: u64) -> String {
    if bps == 0 {
        return String::new();
    }
    let kilo = to_f64(bps) / SPEED_KB;
    if kilo > SPEED_KB {
        format!("{:.1} MB/s", kilo / SPEED_KB)
    } else {
        format!("{kilo:.1} kB/s")
    }
}

pub(crate) fn format_eta(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return String::new();
    };
    let hours = seconds / 3600;
    if hours >= 24 {
        format!("{}d", hours / 24)
    } else if hours >= 1 {
        format!("{hours}h")
    } else if seconds >= 60 {
        format!("{}m", seconds / 60)
    } else {
        format!("{seconds}s")
    }
}

pub(crate) fn format_progress(fraction: f64) -> String {
    let percent = (fraction * 100.0).clamp(0.0, 100.0);
    let text = format!("{percent:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}%")
}

pub(crate) fn format_date(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub(crate) fn status_label(summary: &TorrentSummary) -> &'static str {
    if summary.has_error() {
        "Errored"
    } else {
        summary.status.as_str()
    }
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_torrent_list(
    torrents: &[TorrentSummary],
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&torrents),
        OutputFormat::Table => {
            let mut out = format!(
                "{:>5} {:<11} {:>6} {:>10} {:>11} {:>11} {:>5} NAME\n",
                "ID", "STATUS", "DONE", "SIZE", "DOWN", "UP", "ETA"
            );
            for torrent in torrents {
                out.push_str(&format!(
                    "{:>5} {:<11} {:>6} {:>10} {:>11} {:>11} {:>5} {}\n",
                    torrent.id,
                    status_label(torrent),
                    format_progress(torrent.percent_done),
                    format_size(torrent.size_when_done),
                    format_speed(torrent.download_bps),
                    format_speed(torrent.upload_bps),
                    format_eta(torrent.eta_seconds),
                    torrent.name
                ));
                if let Some(message) = &torrent.error_message {
                    out.push_str(&format!("{:>5} error: {message}\n", ""));
                }
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
struct TreeEntry<'a> {
    path: String,
    directory: bool,
    size: u64,
    completed: u64,
    progress: f64,
    wanted: &'a str,
    priority: &'a str,
}

/// Plain indentation per depth level of a content row.
pub(crate) fn indent(depth: usize) -> String {
    "  ".repeat(depth.saturating_sub(1))
}

/// Row label: the node name, with a trailing `/` for directories.
pub(crate) fn node_label(tree: &ContentTree, id: NodeId) -> String {
    let node = &tree[id];
    if node.is_directory() {
        format!("{}/", node.name())
    } else {
        node.name().to_string()
    }
}

pub(crate) fn render_content_tree(
    tree: &ContentTree,
    base_path: &str,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<TreeEntry<'_>> = tree
                .rows()
                .into_iter()
                .map(|row| {
                    let node = &tree[row.id];
                    TreeEntry {
                        path: node.full_path().join("/"),
                        directory: node.is_directory(),
                        size: node.size(),
                        completed: node.completed(),
                        progress: node.progress(),
                        wanted: node.wanted_state().marker(),
                        priority: node.priority_state().as_str(),
                    }
                })
                .collect();
            to_json(&entries)
        }
        OutputFormat::Table => {
            let mut out = format!("{base_path}\n");
            for row in tree.rows() {
                let node = &tree[row.id];
                out.push_str(&format!(
                    "{} {:<6} {:>6} {:>10}  {}{}\n",
                    node.wanted_state().marker(),
                    node.priority_state().as_str(),
                    format_progress(node.progress()),
                    format_size(node.size()),
                    indent(row.depth),
                    node_label(tree, row.id)
                ));
            }
            Ok(out)
        }
    }
}
