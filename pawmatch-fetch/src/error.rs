//! Fetch error types.

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Error type for calls to the dogs service.
///
/// Any non-success status other than 401 maps to [`ApiError::RequestFailed`];
/// validation errors, rate limiting and server faults are not told apart.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered 401. The session observer has already run.
    #[error("Session expired.")]
    SessionExpired {
        /// Endpoint that produced the 401.
        endpoint: Endpoint,
    },

    /// The service answered with another non-success status.
    #[error("{message}")]
    RequestFailed {
        /// Endpoint that failed.
        endpoint: Endpoint,
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the endpoint's generic message.
        message: String,
    },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        /// Endpoint whose body failed to decode.
        endpoint: Endpoint,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Base URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns true for a 401 from any endpoint.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Endpoint the failure came from, when known.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::SessionExpired { endpoint }
            | Self::RequestFailed { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            Self::Network(_) | Self::InvalidUrl(_) => None,
        }
    }
}
