// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `PawMatch` Core
//!
//! Core types and search models for the `PawMatch` client.
//!
//! This crate has no I/O. It provides the data shared by every other
//! `PawMatch` crate:
//!
//! - Records returned by the dogs service
//! - Search filters and the pagination cursor
//! - The mapping from filters to wire query parameters
//! - Error types
//!
//! ## Key Types
//!
//! ### Service Records
//! - [`Dog`] - A single adoptable dog
//! - [`DogSearchResult`] - One page of search result ids
//! - [`Match`] - The dog chosen from a favorites list
//!
//! ### Search
//! - [`SearchFilters`] - Sort and filter criteria
//! - [`SortField`] / [`SortOrder`] - Sort key and direction
//! - [`Pagination`] - Offset cursor and page counter
//! - [`DogSearchQuery`] - Wire-level query parameters
//!
//! ### Session
//! - [`User`] - The logged-in user's identity
//! - [`LoginRequest`] - Body of the login call

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Service records
    Dog,
    DogSearchResult,
    Match,
    // Search
    DEFAULT_PAGE_SIZE,
    DogSearchQuery,
    Pagination,
    SearchFilters,
    SortField,
    SortOrder,
    // Session
    LoginRequest,
    User,
};
