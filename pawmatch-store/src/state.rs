//! Application state: the stores wired to one API client.

use pawmatch_core::SearchFilters;
use pawmatch_fetch::{ApiClient, DogApi};
use std::sync::Arc;
use tracing::debug;

use crate::dog_store::DogStore;
use crate::error::StoreError;
use crate::navigator::{Navigator, Route};
use crate::session_store::{SessionState, SessionStore};
use crate::settings_store::Settings;

/// Everything a view needs: routing, session and search state.
#[derive(Clone)]
pub struct AppState {
    navigator: Navigator,
    session: SessionStore,
    dogs: DogStore,
}

impl AppState {
    /// Builds the HTTP client from `settings` and wires the stores to it.
    ///
    /// The session state is registered as the client's observer, so any 401
    /// clears the session and the search store.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid settings or an unusable base URL.
    pub fn new(settings: &Settings) -> Result<Self, StoreError> {
        settings.validate()?;
        let navigator = Navigator::new();
        let session = SessionState::new(navigator.clone());
        let client = ApiClient::new(&settings.fetch_settings())?
            .with_observer(Arc::new(session.clone()));
        debug!(base_url = %client.base_url(), "API client ready");

        let filters = SearchFilters::default()
            .with_sort(settings.default_sort, settings.default_order);
        Self::with_api(Arc::new(client), session, settings.page_size, filters)
    }

    /// Wires the stores to an existing API implementation.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero page size or invalid filters.
    pub fn with_api(
        api: Arc<dyn DogApi>,
        session: SessionState,
        page_size: usize,
        filters: SearchFilters,
    ) -> Result<Self, StoreError> {
        let dogs = DogStore::with_page_size(Arc::clone(&api), page_size, filters)?
            .with_session_events(session.subscribe_ended());
        Ok(Self {
            navigator: session.navigator().clone(),
            session: SessionStore::new(session, api),
            dogs,
        })
    }

    /// The router.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Current route.
    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    /// Session actions.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Search and favorites actions.
    pub fn dogs(&self) -> &DogStore {
        &self.dogs
    }
}
