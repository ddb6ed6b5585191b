//! Search filters and the wire query they map to.
//!
//! [`SearchFilters`] is what the user edits. [`DogSearchQuery`] is what goes
//! on the wire to `GET /dogs/search`. The mapping omits empty and default
//! values so the service only sees constraints the user actually set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::pagination::Pagination;

// ============================================================================
// Sort Options
// ============================================================================

/// Field the search results are sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Breed name.
    #[default]
    Breed,
    /// Age in years.
    Age,
    /// Dog's name.
    Name,
}

impl SortField {
    /// Wire name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breed => "breed",
            Self::Age => "age",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breed" => Ok(Self::Breed),
            "age" => Ok(Self::Age),
            "name" => Ok(Self::Name),
            _ => Err(CoreError::UnknownSortField(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Wire name of this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CoreError::UnknownSortOrder(s.to_string())),
        }
    }
}

// ============================================================================
// Search Filters
// ============================================================================

/// User-declared search criteria.
///
/// The store keeps two snapshots of this type: the committed filters that
/// drove the last search and the pending filters under edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    /// Sort key.
    pub sort: SortField,
    /// Sort direction.
    pub order: SortOrder,
    /// Selected breeds. Order is irrelevant to the service.
    pub breeds: Vec<String>,
    /// Selected zip codes.
    pub zip_codes: Vec<String>,
    /// Minimum age in years.
    pub age_min: Option<u32>,
    /// Maximum age in years.
    pub age_max: Option<u32>,
}

impl SearchFilters {
    /// Creates empty filters sorted by breed ascending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the breeds.
    #[must_use]
    pub fn with_breeds<I, S>(mut self, breeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.breeds = breeds.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the zip codes.
    #[must_use]
    pub fn with_zip_codes<I, S>(mut self, zip_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zip_codes = zip_codes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the sort key and direction.
    #[must_use]
    pub fn with_sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    /// Sets the age bounds.
    #[must_use]
    pub fn with_age_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.age_min = min;
        self.age_max = max;
        self
    }

    /// Wire form of the sort, e.g. `breed:asc`.
    pub fn sort_param(&self) -> String {
        format!("{}:{}", self.sort, self.order)
    }

    /// Checks the filters are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAgeRange`] when the minimum age exceeds
    /// the maximum.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.age_min, self.age_max) {
            if min > max {
                return Err(CoreError::InvalidAgeRange { min, max });
            }
        }
        Ok(())
    }

    /// Builds the wire query for one page of results.
    ///
    /// Empty lists are omitted and an age of zero counts as unset. The sort
    /// is only sent when `include_sort` is true; follow-up pages rely on the
    /// service keeping the order of the original query.
    pub fn to_query(&self, pagination: &Pagination, include_sort: bool) -> DogSearchQuery {
        DogSearchQuery {
            breeds: non_empty(&self.breeds),
            zip_codes: non_empty(&self.zip_codes),
            age_min: self.age_min.filter(|&age| age > 0),
            age_max: self.age_max.filter(|&age| age > 0),
            size: Some(pagination.page_size),
            from: Some(pagination.first),
            sort: include_sort.then(|| self.sort_param()),
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

// ============================================================================
// Wire Query
// ============================================================================

/// Query parameters for `GET /dogs/search`.
///
/// `None` fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DogSearchQuery {
    /// Breeds, sent comma-joined.
    pub breeds: Option<Vec<String>>,
    /// Zip codes, sent comma-joined.
    pub zip_codes: Option<Vec<String>>,
    /// Minimum age.
    pub age_min: Option<u32>,
    /// Maximum age.
    pub age_max: Option<u32>,
    /// Page size.
    pub size: Option<usize>,
    /// Result offset.
    pub from: Option<usize>,
    /// Sort as `field:order`.
    pub sort: Option<String>,
}

impl DogSearchQuery {
    /// Renders the query as ordered key/value pairs.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(breeds) = &self.breeds {
            pairs.push(("breeds", breeds.join(",")));
        }
        if let Some(zip_codes) = &self.zip_codes {
            pairs.push(("zipCodes", zip_codes.join(",")));
        }
        if let Some(age_min) = self.age_min {
            pairs.push(("ageMin", age_min.to_string()));
        }
        if let Some(age_max) = self.age_max {
            pairs.push(("ageMax", age_max.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }

        pairs
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<String> {
        self.to_pairs()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Renders the query as a URL-encoded string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
