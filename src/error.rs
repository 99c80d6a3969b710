//! Error types for session, authentication and API operations.

use std::sync::Arc;
use thiserror::Error;

/// Errors returned by every fallible operation in this crate.
///
/// The type is `Clone` so that one failed login can be handed to every
/// caller that was waiting on it. Foreign sources are kept behind `Arc`.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Login or keep-alive answered with a non-success status.
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    /// Network, TLS or timeout failure while reaching an endpoint.
    #[error("transport error: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    /// Bad caller input or configuration, detected before any request is sent.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The JSON-RPC layer returned an error object.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The session was shut down while the operation was waiting.
    #[error("session has been shut down")]
    Cancelled,

    /// A bug inside the session, such as the login task dying mid-flight.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
