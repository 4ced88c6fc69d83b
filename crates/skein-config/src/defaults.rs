//! Built-in configuration values.
//!
//! # Design
//! - Match the daemon's stock RPC endpoint so a local install works unconfigured.
//! - Keep every default in one place so the model and its tests agree.

pub(crate) const HOST: &str = "127.0.0.1";
pub(crate) const PORT: u16 = 9091;
pub(crate) const RPC_PATH: &str = "/transmission/rpc";
pub(crate) const TIMEOUT_SECS: u64 = 10;
pub(crate) const POLL_INTERVAL_SECS: u64 = 2;
pub(crate) const PEERS_INTERVAL_SECS: u64 = 2;
pub(crate) const LOG_LEVEL: &str = skein_telemetry::DEFAULT_LOG_LEVEL;
