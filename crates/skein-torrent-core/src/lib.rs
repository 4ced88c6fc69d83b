#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Daemon-agnostic torrent DTOs and the service traits implemented by daemon adapters.
//!
//! Layout: `model/` (identifiers, file records, list/session/peer/tracker snapshots),
//! `service/` (`TorrentInspector`, `TorrentWorkflow`), `error.rs` (`TorrentError`).

pub mod error;
pub mod model;
pub mod service;

pub use error::{TorrentError, TorrentResult};
pub use model::{
    AddTorrent, AddTorrentOptions, ContentListing, FilePriority, LeafId, LeafRecord, PeerInfo,
    SessionStats, TorrentAction, TorrentDetails, TorrentId, TorrentSource, TorrentStatusKind,
    TorrentSummary, TrackerInfo, fraction, split_path,
};
pub use service::{DaemonClient, TorrentInspector, TorrentWorkflow};
