//! The calls the stores make against the dogs service.
//!
//! Stores depend on [`DogApi`] rather than on [`crate::ApiClient`] so they
//! can be driven by an in-memory service in tests.

use async_trait::async_trait;
use pawmatch_core::{Dog, DogSearchQuery, DogSearchResult, Match};

use crate::endpoint::Endpoint;
use crate::error::ApiError;

// ============================================================================
// Dog API
// ============================================================================

/// Operations offered by the dogs service.
///
/// Every implementation must treat a 401 from any call the same way:
/// notify its [`SessionObserver`], then fail with
/// [`ApiError::SessionExpired`].
#[async_trait]
pub trait DogApi: Send + Sync {
    /// Starts a cookie session for the given identity.
    async fn login(&self, name: &str, email: &str) -> Result<(), ApiError>;

    /// Lists every breed name.
    async fn fetch_breeds(&self) -> Result<Vec<String>, ApiError>;

    /// Runs a search and returns one page of ids.
    async fn search_dogs(&self, query: &DogSearchQuery) -> Result<DogSearchResult, ApiError>;

    /// Fetches full records for the given ids.
    async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, ApiError>;

    /// Asks the service to pick one dog from the given ids.
    async fn match_dogs(&self, ids: &[String]) -> Result<Match, ApiError>;
}

// ============================================================================
// Session Observer
// ============================================================================

/// Receives session-expiry signals from the API client.
///
/// The client calls this before returning [`ApiError::SessionExpired`], so
/// by the time the caller sees the error the observer has already reacted.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// Called when `endpoint` answered 401.
    async fn session_expired(&self, endpoint: Endpoint);
}
