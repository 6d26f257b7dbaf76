//! HTTP transport for the category tree API.
//!
//! No controller awareness. Just posts JSON bodies via reqwest and
//! classifies the response by status code.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{Args, CallResponse, CallResult, ErrorResult};

/// Errors where no usable response came back from the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unreadable response (status {status}): {message}")]
    InvalidResponse { status: u16, message: String },
}

/// Sends one named operation to the API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call `operation` with `args` as the JSON body.
    async fn call(&self, operation: &str, args: &Args) -> Result<CallResponse, TransportError>;

    /// Ask the server which database backs it (`getDatabaseName`).
    /// Returns `None` when the server reports an error for it.
    async fn database_name(&self) -> Result<Option<String>, TransportError> {
        match self.call("getDatabaseName", &Args::new()).await? {
            CallResponse::Success(result) => Ok(result.data.as_str().map(str::to_string)),
            CallResponse::Failure(_) => Ok(None),
        }
    }
}

/// reqwest-backed transport against `<base_url><operation>`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport with the default 30s timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, operation: &str, args: &Args) -> Result<CallResponse, TransportError> {
        let url = format!("{}{}", self.base_url, operation);
        debug!(%url, ?args, "calling category API");

        let response = self.http.post(&url).json(args).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if status.is_success() {
            let result: CallResult =
                serde_json::from_slice(&body).map_err(|e| TransportError::InvalidResponse {
                    status: status.as_u16(),
                    message: format!("failed to parse result: {e}"),
                })?;
            Ok(CallResponse::Success(result))
        } else {
            let error: ErrorResult =
                serde_json::from_slice(&body).map_err(|e| TransportError::InvalidResponse {
                    status: status.as_u16(),
                    message: format!("failed to parse error body: {e}"),
                })?;
            Ok(CallResponse::Failure(error))
        }
    }
}

/// Operation names are appended directly, so the base must end with `/`.
pub fn normalize_base_url(mut base_url: String) -> String {
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}
