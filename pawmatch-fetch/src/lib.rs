// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # PawMatch Fetch
//!
//! The single point of egress to the dogs service.
//!
//! - [`api::DogApi`] - The calls stores depend on (login, breeds, search,
//!   details, match)
//! - [`client::ApiClient`] - reqwest implementation with a session cookie jar
//! - [`api::SessionObserver`] - Hook told about every 401 before the failing
//!   call returns
//! - [`error::ApiError`] - Failure taxonomy shared by every call
//!
//! ## Example
//!
//! ```ignore
//! use pawmatch_fetch::{ApiClient, DogApi, FetchSettings};
//!
//! let client = ApiClient::new(&FetchSettings::default())?;
//! client.login("Ada", "ada@example.com").await?;
//! let breeds = client.fetch_breeds().await?;
//! ```

pub mod api;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod settings;

// Re-export key types at crate root
pub use api::{DogApi, SessionObserver};
pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use settings::{DEFAULT_BASE_URL, FetchSettings};
