//! Records returned by the dogs service.

use serde::{Deserialize, Serialize};

// ============================================================================
// Dog
// ============================================================================

/// A single adoptable dog.
///
/// Fields mirror the service payload verbatim, including the snake-case
/// `zip_code` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dog {
    /// Opaque identifier.
    pub id: String,
    /// Image URL.
    pub img: String,
    /// Dog's name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Postal code where the dog is located.
    pub zip_code: String,
    /// Breed name.
    pub breed: String,
}

impl Dog {
    /// One-line summary used by list views.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, {} yr{}) - {}",
            self.name,
            self.breed,
            self.age,
            if self.age == 1 { "" } else { "s" },
            self.zip_code
        )
    }
}

// ============================================================================
// Search Result
// ============================================================================

/// One page of search result ids from `GET /dogs/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogSearchResult {
    /// Ids of the dogs on this page.
    pub result_ids: Vec<String>,
    /// Total number of dogs matching the query.
    pub total: usize,
    /// Query string for the next page, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Query string for the previous page, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl DogSearchResult {
    /// Returns true if the page holds no ids.
    pub fn is_empty(&self) -> bool {
        self.result_ids.is_empty()
    }
}

// ============================================================================
// Match
// ============================================================================

/// The dog chosen by the service from a submitted favorites list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Id of the matched dog.
    #[serde(rename = "match")]
    pub dog_id: String,
}
