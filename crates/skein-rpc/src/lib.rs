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

//! JSON-over-HTTP adapter for a Transmission-compatible daemon.
//!
//! [`TransmissionClient`] implements the `TorrentInspector` and
//! `TorrentWorkflow` traits from `skein-torrent-core`. Every call is a POST of
//! `{"method", "arguments"}`; the daemon's CSRF session id is negotiated on the
//! first 409 and reused afterwards.
//!
//! Layout: `client.rs` (transport and session handshake), `wire.rs` (request
//! and response shapes), `convert.rs` (wire to domain mapping), `adapter.rs`
//! (trait implementations), `error.rs` (`RpcError`).

mod adapter;
mod client;
mod convert;
pub mod error;
mod wire;

pub use client::{SESSION_HEADER, TransmissionClient};
pub use error::{RpcError, RpcResult};
