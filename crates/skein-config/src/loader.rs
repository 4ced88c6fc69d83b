//! Layered loading: built-in defaults, then a JSON file, then overrides.
//!
//! # Design
//! - A layer mirrors [`ClientConfig`] with every field optional; unset fields
//!   fall through to the layer below.
//! - Unknown keys in the file are rejected rather than silently ignored.
//! - The merged result is validated once, after all layers are applied.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use skein_telemetry::LogFormat;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::ClientConfig;
use crate::validate::validate;

/// Partial configuration read from a file or assembled from flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    /// Daemon overrides.
    pub daemon: DaemonLayer,
    /// Refresh overrides.
    pub refresh: RefreshLayer,
    /// Logging overrides.
    pub logging: LoggingLayer,
}

/// Optional daemon fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonLayer {
    /// Host name or address.
    pub host: Option<String>,
    /// RPC port.
    pub port: Option<u16>,
    /// RPC path.
    pub rpc_path: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Optional refresh fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshLayer {
    /// List poll interval in seconds.
    pub poll_interval_secs: Option<u64>,
    /// Peers refresh interval in seconds.
    pub peers_interval_secs: Option<u64>,
}

/// Optional logging fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingLayer {
    /// Filter directive.
    pub level: Option<String>,
    /// Output format.
    pub format: Option<LogFormat>,
    /// Log file path.
    pub file: Option<PathBuf>,
}

/// Read a configuration layer from a JSON file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and
/// [`ConfigError::Parse`] when it is not a valid layer.
pub fn load_file(path: &Path) -> ConfigResult<ConfigLayer> {
    let raw = fs::read(path).map_err(|source| ConfigError::Io {
        operation: "read config",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl ConfigLayer {
    /// Overwrite `config` with every field this layer sets.
    pub fn apply(self, config: &mut ClientConfig) {
        let Self {
            daemon,
            refresh,
            logging,
        } = self;
        set(&mut config.daemon.host, daemon.host);
        set(&mut config.daemon.port, daemon.port);
        set(&mut config.daemon.rpc_path, daemon.rpc_path);
        set(&mut config.daemon.timeout_secs, daemon.timeout_secs);
        set(&mut config.refresh.poll_interval_secs, refresh.poll_interval_secs);
        set(
            &mut config.refresh.peers_interval_secs,
            refresh.peers_interval_secs,
        );
        set(&mut config.logging.level, logging.level);
        set(&mut config.logging.format, logging.format);
        if logging.file.is_some() {
            config.logging.file = logging.file;
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ClientConfig {
    /// Resolve defaults, the optional file at `file`, then `overrides`.
    ///
    /// # Errors
    ///
    /// Propagates file errors from [`load_file`] and validation errors from
    /// [`validate`].
    pub fn layered(file: Option<&Path>, overrides: ConfigLayer) -> ConfigResult<Self> {
        let mut config = Self::default();
        if let Some(path) = file {
            debug!(path = %path.display(), "loading config file");
            load_file(path)?.apply(&mut config);
        }
        overrides.apply(&mut config);
        validate(&config)?;
        Ok(config)
    }
}
