//! Domain models for PawMatch.
//!
//! ## Submodules
//!
//! - [`dog`] - Records returned by the dogs service (Dog, DogSearchResult, Match)
//! - [`search`] - Filters, sort options and the wire query
//! - [`pagination`] - Offset cursor for paged searches
//! - [`user`] - Session identity

mod dog;
mod pagination;
mod search;
mod user;

// Re-export everything at the models level
pub use dog::{Dog, DogSearchResult, Match};
pub use pagination::{DEFAULT_PAGE_SIZE, Pagination};
pub use search::{DogSearchQuery, SearchFilters, SortField, SortOrder};
pub use user::{LoginRequest, User};
