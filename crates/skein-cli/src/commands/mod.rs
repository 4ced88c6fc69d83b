//! Subcommand handlers.

pub(crate) mod torrents;
pub(crate) mod tui;
