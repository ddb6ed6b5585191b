//! Settings for the API client.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Base URL of the hosted dogs service.
pub const DEFAULT_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Service base URL.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl FetchSettings {
    /// Creates settings for a custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parses the base URL, ensuring it ends with a slash so endpoint paths
    /// join beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the URL cannot be parsed or
    /// cannot carry a path.
    pub fn parsed_base_url(&self) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(self.base_url.trim()).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                self.base_url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}
