//! # Design
//!
//! - Transport, protocol and decode failures of the daemon adapter live here.
//! - Messages stay short; the RPC method travels as a field.
//! - Callers outside the crate only ever see them boxed inside `TorrentError`.

use skein_torrent_core::{TorrentError, TorrentId};
use thiserror::Error;

/// Failure talking to the daemon.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Underlying builder error.
        #[source]
        source: reqwest::Error,
    },
    /// The request never produced a response, or the body could not be read.
    #[error("daemon unreachable")]
    Transport {
        /// RPC method being called.
        method: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The daemon answered 409 without a usable session id header.
    #[error("daemon did not provide a session id")]
    MissingSessionId {
        /// RPC method being called.
        method: &'static str,
    },
    /// The daemon rejected a freshly negotiated session id.
    #[error("daemon rejected the session id")]
    SessionRejected {
        /// RPC method being called.
        method: &'static str,
    },
    /// The daemon answered with a non-success HTTP status.
    #[error("daemon answered HTTP {status}")]
    Status {
        /// RPC method being called.
        method: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not the expected JSON.
    #[error("malformed daemon response")]
    Decode {
        /// RPC method being called.
        method: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The daemon understood the request but reported a failure.
    #[error("daemon refused: {result}")]
    Rejected {
        /// RPC method being called.
        method: &'static str,
        /// Daemon-provided result string.
        result: String,
    },
}

impl RpcError {
    /// RPC method the failure belongs to, when there is one.
    #[must_use]
    pub const fn method(&self) -> Option<&'static str> {
        match self {
            Self::ClientBuild { .. } => None,
            Self::Transport { method, .. }
            | Self::MissingSessionId { method }
            | Self::SessionRejected { method }
            | Self::Status { method, .. }
            | Self::Decode { method, .. }
            | Self::Rejected { method, .. } => Some(*method),
        }
    }
}

/// Convenience alias for adapter results.
pub type RpcResult<T> = Result<T, RpcError>;

/// Wrap an adapter failure as a `TorrentError` tagged with the domain operation.
pub(crate) fn op_failed(
    operation: &'static str,
    torrent_id: Option<TorrentId>,
) -> impl FnOnce(RpcError) -> TorrentError {
    move |source| TorrentError::failed(operation, torrent_id, source)
}
