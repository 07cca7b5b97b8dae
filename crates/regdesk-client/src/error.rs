//! Internal error types for registry API operations.
//!
//! These errors are internal to `regdesk-client` and are mapped to core
//! port errors at the boundary.

use thiserror::Error;

use regdesk_core::{ProbeError, RegistryError};

use crate::api::ApiErrorBody;

/// Result type alias for registry client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors related to registry API operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("registry API request failed with status {status}: {}", body.message)]
    ApiStatus {
        status: u16,
        url: String,
        body: ApiErrorBody,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<ClientError> for RegistryError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ApiStatus { status: 404, url, body } => {
                if body.message == "Request failed" {
                    Self::NotFound(url)
                } else {
                    Self::NotFound(body.message)
                }
            }
            ClientError::ApiStatus { status, body, .. } => Self::Api {
                message: body.message,
                status: Some(status),
                code: body.code,
                details: body.details,
            },
            ClientError::Network(e) => Self::Transport(e.to_string()),
            ClientError::InvalidUrl(e) => Self::Transport(e.to_string()),
            ClientError::JsonParse(e) => Self::Transport(format!("malformed response: {e}")),
        }
    }
}

impl From<ClientError> for ProbeError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ApiStatus { status, body, .. } => Self {
                message: body.message,
                status: Some(status),
                code: body.code,
                details: body.details,
            },
            other => Self::message(other.to_string()),
        }
    }
}
