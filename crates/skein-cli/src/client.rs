//! Shared error type and the daemon context handed to commands.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use skein_config::{ClientConfig, ConfigError};
use skein_rpc::TransmissionClient;
use skein_torrent_core::{DaemonClient, TorrentError};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::validation(format!("configuration: {}", error.describe()))
    }
}

impl From<TorrentError> for CliError {
    fn from(error: TorrentError) -> Self {
        match error {
            TorrentError::NotFound { torrent_id } => {
                Self::validation(format!("torrent {torrent_id} not found"))
            }
            other => Self::failure(anyhow!(other.describe())),
        }
    }
}

/// Daemon handle and resolved configuration passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) daemon: Arc<dyn DaemonClient>,
    pub(crate) config: ClientConfig,
}

impl AppContext {
    /// Connect to the daemon described by `config`.
    pub(crate) fn connect(config: ClientConfig) -> CliResult<Self> {
        let endpoint = config.daemon.rpc_url()?;
        let client = TransmissionClient::new(endpoint, config.daemon.timeout())
            .map_err(|err| CliError::failure(anyhow!("failed to build RPC client: {err}")))?;
        Ok(Self {
            daemon: Arc::new(client),
            config,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_daemon(daemon: Arc<dyn DaemonClient>) -> Self {
        Self {
            daemon,
            config: ClientConfig::default(),
        }
    }
}
