//! Typed client configuration.
//!
//! # Design
//! - Pure data carriers; reading and merging lives in `loader.rs`.
//! - Durations are stored as whole seconds so the JSON file stays readable.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skein_telemetry::LogFormat;
use url::Url;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

/// Fully resolved client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Daemon endpoint and request settings.
    pub daemon: DaemonConfig,
    /// Background refresh cadence.
    pub refresh: RefreshConfig,
    /// Log output settings.
    pub logging: LoggingSettings,
}

/// Where the daemon listens and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Host name or address of the daemon.
    pub host: String,
    /// RPC port.
    pub port: u16,
    /// HTTP path of the RPC endpoint.
    pub rpc_path: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Cadence of the list poll and the peers-view refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between torrent-list polls.
    pub poll_interval_secs: u64,
    /// Seconds between peer refreshes while the peers view is open.
    pub peers_interval_secs: u64,
}

/// Logging level, format and optional file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Log file; the interactive UI only logs when this is set.
    pub file: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            rpc_path: defaults::RPC_PATH.to_string(),
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::POLL_INTERVAL_SECS,
            peers_interval_secs: defaults::PEERS_INTERVAL_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: LogFormat::infer(),
            file: None,
        }
    }
}

impl DaemonConfig {
    /// Full RPC URL built from host, port and path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when the host does not form a
    /// valid URL.
    pub fn rpc_url(&self) -> ConfigResult<Url> {
        let raw = format!("http://{}:{}{}", self.host, self.port, self.rpc_path);
        Url::parse(&raw).map_err(|_| ConfigError::InvalidField {
            section: "daemon",
            field: "host",
            value: Some(self.host.clone()),
            reason: "does not form a valid URL",
        })
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RefreshConfig {
    /// Interval between list polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Interval between peer refreshes.
    #[must_use]
    pub const fn peers_interval(&self) -> Duration {
        Duration::from_secs(self.peers_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_daemon() -> ConfigResult<()> {
        let config = ClientConfig::default();
        assert_eq!(
            config.daemon.rpc_url()?.as_str(),
            "http://127.0.0.1:9091/transmission/rpc"
        );
        assert_eq!(config.daemon.timeout(), Duration::from_secs(10));
        assert_eq!(config.refresh.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.refresh.peers_interval(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        Ok(())
    }

    #[test]
    fn rpc_url_rejects_unusable_host() {
        let daemon = DaemonConfig {
            host: "bad host".into(),
            ..DaemonConfig::default()
        };
        assert!(matches!(
            daemon.rpc_url(),
            Err(ConfigError::InvalidField { field: "host", .. })
        ));
    }
}
