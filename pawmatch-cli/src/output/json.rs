//! JSON output formatting.

use anyhow::Result;
use pawmatch_core::{Dog, SearchFilters};
use pawmatch_store::{SearchPhase, SearchSnapshot};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput<'a> {
    pub total: usize,
    pub page: usize,
    pub from: usize,
    pub page_size: usize,
    pub filters: &'a SearchFilters,
    pub dogs: &'a [Dog],
    pub favorites: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// JSON output for a match.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutput<'a> {
    #[serde(rename = "match")]
    pub matched: &'a Dog,
    pub favorites: &'a [String],
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a search snapshot.
    pub fn format_search(&self, snapshot: &SearchSnapshot) -> Result<String> {
        let error = match snapshot.phase {
            SearchPhase::Error => snapshot.last_error.as_deref(),
            _ => None,
        };
        self.format(&SearchOutput {
            total: snapshot.total_dogs,
            page: snapshot.pagination.page,
            from: snapshot.pagination.first,
            page_size: snapshot.pagination.page_size,
            filters: &snapshot.filters,
            dogs: &snapshot.dogs,
            favorites: &snapshot.favorites,
            error,
        })
    }

    /// Formats a match.
    pub fn format_match(&self, dog: &Dog, favorites: &[String]) -> Result<String> {
        self.format(&MatchOutput {
            matched: dog,
            favorites,
        })
    }
}
