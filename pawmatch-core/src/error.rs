//! Core error types for `PawMatch`.

use thiserror::Error;

/// Core error type for `PawMatch` model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Minimum age is greater than maximum age.
    #[error("Invalid age range: minimum {min} is greater than maximum {max}")]
    InvalidAgeRange {
        /// Requested minimum age.
        min: u32,
        /// Requested maximum age.
        max: u32,
    },

    /// Page size must be at least one.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Sort field not recognized.
    #[error("Unknown sort field: {0} (expected breed, age or name)")]
    UnknownSortField(String),

    /// Sort order not recognized.
    #[error("Unknown sort order: {0} (expected asc or desc)")]
    UnknownSortOrder(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
