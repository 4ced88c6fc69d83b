//! Error types for torrent core services.

use std::error::Error;

use thiserror::Error;

use crate::model::TorrentId;

/// Primary error type for daemon-facing torrent operations.
#[derive(Debug, Error)]
pub enum TorrentError {
    /// Operation is not supported by the daemon adapter.
    #[error("torrent operation not supported")]
    Unsupported {
        /// Operation identifier.
        operation: &'static str,
    },
    /// Operation failed in the daemon or on the way to it.
    #[error("torrent operation failed")]
    OperationFailed {
        /// Operation identifier.
        operation: &'static str,
        /// Torrent identifier when available.
        torrent_id: Option<TorrentId>,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Torrent was not found.
    #[error("torrent not found")]
    NotFound {
        /// Missing torrent identifier.
        torrent_id: TorrentId,
    },
}

impl TorrentError {
    /// Wrap an adapter failure with the operation that produced it.
    pub fn failed(
        operation: &'static str,
        torrent_id: Option<TorrentId>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::OperationFailed {
            operation,
            torrent_id,
            source: source.into(),
        }
    }

    /// Operation identifier carried by the error, when there is one.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Unsupported { operation } | Self::OperationFailed { operation, .. } => {
                Some(*operation)
            }
            Self::NotFound { .. } => None,
        }
    }

    /// One-line description including the operation and the source chain,
    /// suitable for a status bar.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Unsupported { operation } => format!("{operation}: not supported"),
            Self::NotFound { torrent_id } => format!("torrent {torrent_id} not found"),
            Self::OperationFailed {
                operation, source, ..
            } => {
                let mut message = format!("{operation}: {source}");
                let mut cause = source.source();
                while let Some(inner) = cause {
                    message.push_str(": ");
                    message.push_str(&inner.to_string());
                    cause = inner.source();
                }
                message
            }
        }
    }
}

/// Convenience alias for torrent operation results.
pub type TorrentResult<T> = Result<T, TorrentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn describe_includes_operation_and_source() {
        let err = TorrentError::failed(
            "torrent.set_wanted",
            Some(TorrentId(4)),
            io::Error::other("connection reset"),
        );
        assert_eq!(err.operation(), Some("torrent.set_wanted"));
        assert_eq!(err.describe(), "torrent.set_wanted: connection reset");
    }

    #[test]
    fn not_found_describes_torrent() {
        let err = TorrentError::NotFound {
            torrent_id: TorrentId(9),
        };
        assert!(err.operation().is_none());
        assert_eq!(err.describe(), "torrent 9 not found");
    }
}
