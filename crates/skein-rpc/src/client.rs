//! HTTP transport with the daemon's session-id handshake.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::error::{RpcError, RpcResult};
use crate::wire::{Request, Response};

/// Header carrying the daemon's CSRF session id.
pub const SESSION_HEADER: &str = "X-Transmission-Session-Id";

const SUCCESS: &str = "success";

/// Daemon client speaking the Transmission RPC protocol.
///
/// Cheap to share behind an `Arc`; the negotiated session id is kept
/// internally and refreshed whenever the daemon answers 409.
#[derive(Debug)]
pub struct TransmissionClient {
    http: Client,
    endpoint: Url,
    session_id: Mutex<Option<String>>,
}

impl TransmissionClient {
    /// Build a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::ClientBuild`] when the TLS backend cannot be
    /// initialised.
    pub fn new(endpoint: Url, timeout: Duration) -> RpcResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RpcError::ClientBuild { source })?;
        Ok(Self::with_client(http, endpoint))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            session_id: Mutex::new(None),
        }
    }

    /// RPC endpoint this client posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Call `method` and decode its `arguments` object.
    ///
    /// A 409 answer stores the session id the daemon offers and re-sends the
    /// request once. A second 409 is an error.
    pub(crate) async fn call<A, R>(&self, method: &'static str, arguments: A) -> RpcResult<R>
    where
        A: Serialize + Send + Sync,
        R: DeserializeOwned + Default,
    {
        let body = Request { method, arguments };
        let mut renegotiated = false;
        loop {
            let session = self.session_id.lock().await.clone();
            let mut request = self.http.post(self.endpoint.clone()).json(&body);
            if let Some(session) = session {
                request = request.header(SESSION_HEADER, session);
            }
            debug!(method, "daemon request");
            let response = request
                .send()
                .await
                .map_err(|source| RpcError::Transport { method, source })?;

            if response.status() == StatusCode::CONFLICT {
                if renegotiated {
                    return Err(RpcError::SessionRejected { method });
                }
                let fresh = response
                    .headers()
                    .get(SESSION_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                    .ok_or(RpcError::MissingSessionId { method })?;
                info!(method, "negotiated daemon session id");
                *self.session_id.lock().await = Some(fresh);
                renegotiated = true;
                continue;
            }

            let status = response.status();
            if !status.is_success() {
                return Err(RpcError::Status {
                    method,
                    status: status.as_u16(),
                });
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|source| RpcError::Transport { method, source })?;
            let decoded: Response<R> = serde_json::from_slice(&bytes)
                .map_err(|source| RpcError::Decode { method, source })?;
            if decoded.result != SUCCESS {
                return Err(RpcError::Rejected {
                    method,
                    result: decoded.result,
                });
            }
            return Ok(decoded.arguments.unwrap_or_default());
        }
    }
}
