//! Store error types.

use pawmatch_core::CoreError;
use pawmatch_fetch::ApiError;
use thiserror::Error;

/// Errors that can occur in the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Call to the dogs service failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Model validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
