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
#![allow(clippy::redundant_pub_crate)]

//! Terminal client for a remote torrent daemon.
//!
//! Layout:
//! - `cli.rs`: argument parsing, configuration resolution and dispatch
//! - `client.rs`: error type and the daemon context shared by commands
//! - `commands/`: one-shot subcommands and the interactive entry point
//! - `app/`: application state, torrent list, content and peers views, and
//!   the refresh coordinator that serializes access to them
//! - `ui/`: terminal setup, key bindings and rendering
//! - `output.rs`: formatters and plain-text/JSON renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod app;
pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod ui;

pub use cli::run;
