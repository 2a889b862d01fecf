//! Remote collection endpoint client.
//!
//! Ships a serialized log buffer in a single POST. Exactly one outcome per
//! call: `Ok` for a status in `[200, 400)`, an error for anything else,
//! including transport failures and the bounded request timeout.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

/// Default bound on the whole request, connect included.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from shipping a log payload.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collector rejected payload: status {status}")]
    Status { status: u16 },

    #[error("no endpoint configured")]
    NoEndpoint,
}

/// HTTP client for the log collection endpoint.
pub struct RemoteSink {
    http: reqwest::Client,
}

impl RemoteSink {
    /// Creates a sink with the default 10s request timeout.
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a sink with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RemoteError> {
        // Redirects are not followed: the success contract is the raw
        // status code range, and following a 303 would re-issue as GET.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http })
    }

    /// POSTs `payload` to `endpoint` as `application/json`.
    ///
    /// A response status in `[200, 400)` is success; any other completion
    /// is an error. No retry is attempted here.
    pub async fn send(&self, endpoint: &str, payload: String) -> Result<(), RemoteError> {
        if endpoint.is_empty() {
            return Err(RemoteError::NoEndpoint);
        }

        let bytes = payload.len();
        let resp = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if (200..400).contains(&status) {
            tracing::debug!(endpoint, status, bytes, "log payload shipped");
            Ok(())
        } else {
            tracing::debug!(endpoint, status, "collector returned failure status");
            Err(RemoteError::Status { status })
        }
    }
}
