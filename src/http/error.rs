//! Request routing failures and their status codes.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything that can stop an inbound request from being served.
///
/// Every variant maps to one attempt against one backend: none of them
/// cause a retry against another server.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("no healthy server available")]
    NoHealthyServer,

    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    #[error("failed to create request to backend: {0}")]
    BuildRequest(#[from] axum::http::Error),

    #[error("failed to forward request to backend: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("backend did not answer within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("failed to read response body: {0}")]
    ResponseBody(#[source] axum::Error),

    #[error("failed to parse response body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("no json field found in the response body")]
    MissingEnvelope,

    #[error("failed to serialize json content: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::NoHealthyServer => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message returned to the client; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::NoHealthyServer => "No healthy server available",
            ProxyError::RequestBody(_) => "Failed to read request body",
            ProxyError::BuildRequest(_) => "Failed to create request to backend",
            ProxyError::Upstream(_) | ProxyError::UpstreamTimeout(_) => {
                "Failed to forward request to backend"
            }
            ProxyError::ResponseBody(_) => "Failed to read response body",
            ProxyError::InvalidJson(_) => "Failed to parse response body",
            ProxyError::MissingEnvelope => "No JSON content in the response",
            ProxyError::Serialize(_) => "Failed to marshal JSON content",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}
