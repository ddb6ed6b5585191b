// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # PawMatch Store
//!
//! State management for PawMatch.
//!
//! This crate provides:
//!
//! - **SessionStore**: Login, logout and session verification
//! - **DogStore**: Search filters, pagination, results and favorites
//! - **Navigator**: The current route, redirected to login on session end
//! - **SettingsStore**: User preferences with persistence
//! - **AppState**: The stores wired to one API client
//!
//! ## Usage
//!
//! ```ignore
//! use pawmatch_store::{AppState, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?.get().await;
//! let app = AppState::new(&settings)?;
//!
//! app.session().login("Ada", "ada@example.com").await?;
//! app.dogs().set_breeds(vec!["Labrador".into()]).await;
//! app.dogs().commit_search().await;
//!
//! // Subscribe to changes
//! let mut rx = app.dogs().subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Results updated!");
//! }
//! ```

pub mod dog_store;
pub mod error;
pub mod navigator;
pub mod persistence;
pub mod session_store;
pub mod settings_store;
pub mod state;

pub use dog_store::{DogStore, SearchPhase, SearchSnapshot};
pub use error::StoreError;
pub use navigator::{Navigator, Route};
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use session_store::{SessionState, SessionStore};
pub use settings_store::{LogLevel, Settings, SettingsStore};
pub use state::AppState;

#[cfg(test)]
mod persistence_tests;
#[cfg(test)]
mod testing;
