//! Search, pagination and favorites state.
//!
//! The store owns the committed and pending filters, the pagination cursor,
//! the growing result window and the favorites list. Views read snapshots
//! and call the actions; nothing else mutates this state.
//!
//! ## Search lifecycle
//!
//! ```text
//! Idle ──commit──▶ Searching ──ok──▶ Loaded ──next page──▶ LoadingMore
//!                      │                ▲                       │
//!                      └──err──▶ Error  └───────────ok──────────┘
//! ```
//!
//! A commit clears the results before the service answers. Each commit
//! starts a new generation; answers belonging to an older generation are
//! dropped, so a slow earlier search can never overwrite a later one.

use pawmatch_core::{CoreError, Dog, DogSearchQuery, Pagination, SearchFilters, SortField, SortOrder};
use pawmatch_fetch::{ApiError, DogApi};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard, watch};
use tracing::{debug, error, info, warn};

// ============================================================================
// Search Phase
// ============================================================================

/// Where the search state machine currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// No search has run yet.
    #[default]
    Idle,
    /// A committed search is in flight.
    Searching,
    /// Results are loaded.
    Loaded,
    /// The next page is in flight.
    LoadingMore,
    /// The last request failed.
    Error,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only copy of the store for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    /// State machine phase.
    pub phase: SearchPhase,
    /// Loaded dogs, in fetch order.
    pub dogs: Vec<Dog>,
    /// Server-reported total for the committed filters.
    pub total_dogs: usize,
    /// Current cursor.
    pub pagination: Pagination,
    /// Filters driving the loaded results.
    pub filters: SearchFilters,
    /// Filters under edit.
    pub pending: SearchFilters,
    /// Favorite dog ids.
    pub favorites: Vec<String>,
    /// Last failure message, if the last request failed.
    pub last_error: Option<String>,
}

// ============================================================================
// Inner State
// ============================================================================

struct DogStoreInner {
    breeds: Vec<String>,
    dogs: Vec<Dog>,
    total_dogs: usize,
    favorites: Vec<String>,
    /// Committed filters.
    filters: Arc<SearchFilters>,
    /// Pending filters.
    pending: Arc<SearchFilters>,
    pagination: Pagination,
    phase: SearchPhase,
    generation: u64,
    matched: Option<Dog>,
    last_error: Option<String>,
    session_ended: Option<watch::Receiver<u64>>,
}

impl DogStoreInner {
    fn new(pagination: Pagination, filters: SearchFilters) -> Self {
        let filters = Arc::new(filters);
        Self {
            breeds: Vec::new(),
            dogs: Vec::new(),
            total_dogs: 0,
            favorites: Vec::new(),
            pending: Arc::clone(&filters),
            filters,
            pagination,
            phase: SearchPhase::Idle,
            generation: 0,
            matched: None,
            last_error: None,
            session_ended: None,
        }
    }

    /// Drops session-scoped data if the session ended since the last action.
    fn sync_session(&mut self) {
        let ended = self
            .session_ended
            .as_mut()
            .is_some_and(|rx| rx.has_changed().unwrap_or(false));
        if !ended {
            return;
        }
        if let Some(rx) = self.session_ended.as_mut() {
            rx.mark_unchanged();
        }

        info!("Session ended, clearing favorites and results");
        self.favorites.clear();
        self.dogs.clear();
        self.total_dogs = 0;
        self.matched = None;
        self.last_error = None;
        self.pagination.reset();
        self.phase = SearchPhase::Idle;
        // Invalidate anything still in flight.
        self.generation += 1;
    }
}

// ============================================================================
// Dog Store
// ============================================================================

/// Search, pagination and favorites store.
#[derive(Clone)]
pub struct DogStore {
    inner: Arc<RwLock<DogStoreInner>>,
    api: Arc<dyn DogApi>,
    notify: Arc<watch::Sender<u64>>,
    version: Arc<RwLock<u64>>,
}

impl DogStore {
    /// Creates a store with the default page size.
    pub fn new(api: Arc<dyn DogApi>) -> Self {
        Self::with_pagination(api, Pagination::default(), SearchFilters::default())
    }

    /// Creates a store with a custom page size and initial filters.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPageSize`] for a zero page size.
    pub fn with_page_size(
        api: Arc<dyn DogApi>,
        page_size: usize,
        filters: SearchFilters,
    ) -> Result<Self, CoreError> {
        filters.validate()?;
        Ok(Self::with_pagination(api, Pagination::new(page_size)?, filters))
    }

    fn with_pagination(api: Arc<dyn DogApi>, pagination: Pagination, filters: SearchFilters) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(DogStoreInner::new(pagination, filters))),
            api,
            notify: Arc::new(notify),
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Clears favorites and results whenever the given session-end counter
    /// changes.
    #[must_use]
    pub fn with_session_events(self, mut ended: watch::Receiver<u64>) -> Self {
        ended.mark_unchanged();
        {
            // Fresh store, no other handle can hold the lock yet.
            if let Ok(mut inner) = self.inner.try_write() {
                inner.session_ended = Some(ended);
            }
        }
        self
    }

    async fn state(&self) -> RwLockWriteGuard<'_, DogStoreInner> {
        let mut inner = self.inner.write().await;
        inner.sync_session();
        inner
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Copies the state for rendering.
    pub async fn snapshot(&self) -> SearchSnapshot {
        let inner = self.state().await;
        SearchSnapshot {
            phase: inner.phase,
            dogs: inner.dogs.clone(),
            total_dogs: inner.total_dogs,
            pagination: inner.pagination,
            filters: (*inner.filters).clone(),
            pending: (*inner.pending).clone(),
            favorites: inner.favorites.clone(),
            last_error: inner.last_error.clone(),
        }
    }

    /// Loaded dogs.
    pub async fn dogs(&self) -> Vec<Dog> {
        self.state().await.dogs.clone()
    }

    /// Server-reported total for the committed filters.
    pub async fn total_dogs(&self) -> usize {
        self.state().await.total_dogs
    }

    /// Current cursor.
    pub async fn pagination(&self) -> Pagination {
        self.state().await.pagination
    }

    /// Current phase.
    pub async fn phase(&self) -> SearchPhase {
        self.state().await.phase
    }

    /// Committed filters.
    pub async fn filters(&self) -> SearchFilters {
        (*self.state().await.filters).clone()
    }

    /// Pending filters.
    pub async fn pending(&self) -> SearchFilters {
        (*self.state().await.pending).clone()
    }

    /// Known breed names.
    pub async fn breeds(&self) -> Vec<String> {
        self.state().await.breeds.clone()
    }

    /// Dog picked by the last successful match.
    pub async fn matched(&self) -> Option<Dog> {
        self.state().await.matched.clone()
    }

    // ========================================================================
    // Pending Filters
    // ========================================================================

    /// Edits the pending filters.
    ///
    /// The edit is applied to a copy; the pending snapshot is replaced only
    /// if the result validates.
    ///
    /// # Errors
    ///
    /// Returns the validation error and leaves the pending filters unchanged.
    pub async fn edit_pending<F>(&self, f: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut SearchFilters),
    {
        {
            let mut inner = self.state().await;
            let mut edited = (*inner.pending).clone();
            f(&mut edited);
            edited.validate()?;
            inner.pending = Arc::new(edited);
        }
        self.notify_change().await;
        Ok(())
    }

    /// Applies an edit that leaves the age bounds alone.
    ///
    /// Only the age bounds are validated and pending filters are always
    /// valid, so these edits cannot be rejected. A rejection is still logged
    /// rather than dropped.
    async fn edit_pending_infallible<F>(&self, field: &'static str, f: F)
    where
        F: FnOnce(&mut SearchFilters),
    {
        if let Err(e) = self.edit_pending(f).await {
            warn!(field, error = %e, "Filter edit rejected");
        }
    }

    /// Sets the pending breeds.
    pub async fn set_breeds(&self, breeds: Vec<String>) {
        self.edit_pending_infallible("breeds", |f| f.breeds = breeds).await;
    }

    /// Sets the pending zip codes.
    pub async fn set_zip_codes(&self, zip_codes: Vec<String>) {
        self.edit_pending_infallible("zip_codes", |f| f.zip_codes = zip_codes)
            .await;
    }

    /// Sets the pending sort key.
    pub async fn set_sort(&self, sort: SortField) {
        self.edit_pending_infallible("sort", |f| f.sort = sort).await;
    }

    /// Sets the pending sort direction.
    pub async fn set_order(&self, order: SortOrder) {
        self.edit_pending_infallible("order", |f| f.order = order).await;
    }

    /// Sets the pending age bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAgeRange`] if `min > max`.
    pub async fn set_age_range(&self, min: Option<u32>, max: Option<u32>) -> Result<(), CoreError> {
        self.edit_pending(|f| {
            f.age_min = min;
            f.age_max = max;
        })
        .await
    }

    /// Discards pending edits, restoring the committed filters.
    pub async fn reset_pending(&self) {
        {
            let mut inner = self.state().await;
            inner.pending = Arc::clone(&inner.filters);
        }
        self.notify_change().await;
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Commits the pending filters and runs a fresh search.
    ///
    /// Results are cleared and the cursor reset before the service is
    /// called. Failures are logged and leave the result list empty.
    pub async fn commit_search(&self) {
        let (query, generation) = {
            let mut inner = self.state().await;
            inner.filters = Arc::clone(&inner.pending);
            inner.pagination.reset();
            inner.dogs.clear();
            inner.total_dogs = 0;
            inner.last_error = None;
            inner.phase = SearchPhase::Searching;
            inner.generation += 1;
            (inner.filters.to_query(&inner.pagination, true), inner.generation)
        };
        self.notify_change().await;
        info!(generation, query = %query.to_query_string(), "Searching for dogs");

        let outcome = self.fetch_page(&query).await;

        {
            let mut inner = self.state().await;
            if inner.generation != generation {
                debug!(generation, current = inner.generation, "Discarding stale search results");
                return;
            }
            match outcome {
                Ok((dogs, total)) => {
                    info!(count = dogs.len(), total, "Search loaded");
                    inner.total_dogs = total;
                    inner.dogs = dogs;
                    inner.phase = SearchPhase::Loaded;
                }
                Err(e) => {
                    error!(error = %e, "Error searching for dogs");
                    inner.total_dogs = 0;
                    inner.last_error = Some(e.to_string());
                    inner.phase = SearchPhase::Error;
                }
            }
        }
        self.notify_change().await;
    }

    /// Loads the next page and appends it to the results.
    ///
    /// Only runs from `Loaded`, or from `Error` to retry a failed page, and
    /// only if `first + page_size < total_dogs`. While a search or another
    /// page is in flight it does nothing. The query omits the sort; the
    /// service keeps the order of the committed search. On failure the
    /// loaded results and the cursor are kept as they were.
    ///
    /// Returns true if a page was requested.
    pub async fn load_next_page(&self) -> bool {
        let (query, next, generation) = {
            let mut inner = self.state().await;
            if !matches!(inner.phase, SearchPhase::Loaded | SearchPhase::Error) {
                debug!(phase = ?inner.phase, "Request in flight, not loading next page");
                return false;
            }
            if !inner.pagination.has_next(inner.total_dogs) {
                info!("No more results to load.");
                return false;
            }
            let mut next = inner.pagination;
            next.advance();
            inner.phase = SearchPhase::LoadingMore;
            (inner.filters.to_query(&next, false), next, inner.generation)
        };
        self.notify_change().await;
        debug!(from = next.first, page = next.page, "Loading next page");

        let outcome = self.fetch_page(&query).await;

        {
            let mut inner = self.state().await;
            if inner.generation != generation {
                debug!(generation, current = inner.generation, "Discarding stale page");
                return true;
            }
            match outcome {
                Ok((dogs, total)) => {
                    info!(count = dogs.len(), page = next.page, "Next page loaded");
                    inner.pagination = next;
                    inner.total_dogs = total;
                    inner.dogs.extend(dogs);
                    inner.last_error = None;
                    inner.phase = SearchPhase::Loaded;
                }
                Err(e) => {
                    error!(error = %e, "Error loading the next page of dogs");
                    inner.last_error = Some(e.to_string());
                    inner.phase = SearchPhase::Error;
                }
            }
        }
        self.notify_change().await;
        true
    }

    /// Moves the cursor to an arbitrary offset.
    ///
    /// The offset becomes the new ground truth; the next page starts at
    /// `first + page_size`.
    pub async fn jump_to_offset(&self, first: usize) {
        {
            let mut inner = self.state().await;
            inner.pagination.jump_to(first);
            debug!(first, page = inner.pagination.page, "Cursor moved");
        }
        self.notify_change().await;
    }

    /// Runs a search and fetches the records for the returned ids.
    async fn fetch_page(&self, query: &DogSearchQuery) -> Result<(Vec<Dog>, usize), ApiError> {
        let results = self.api.search_dogs(query).await?;
        if results.is_empty() {
            return Ok((Vec::new(), results.total));
        }
        let dogs = self.api.fetch_dogs(&results.result_ids).await?;
        Ok((dogs, results.total))
    }

    /// Loads the breed list. Failures are logged and keep the old list.
    pub async fn load_breeds(&self) {
        match self.api.fetch_breeds().await {
            Ok(breeds) => {
                debug!(count = breeds.len(), "Breeds loaded");
                self.state().await.breeds = breeds;
                self.notify_change().await;
            }
            Err(e) => error!(error = %e, "Error fetching breeds"),
        }
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Favorite dog ids in the order they were added.
    pub async fn favorites(&self) -> Vec<String> {
        self.state().await.favorites.clone()
    }

    /// Returns true if the dog is a favorite.
    pub async fn is_favorite(&self, dog_id: &str) -> bool {
        self.state().await.favorites.iter().any(|id| id == dog_id)
    }

    /// Adds a favorite. Returns false if it was already present.
    pub async fn add_favorite(&self, dog_id: impl Into<String>) -> bool {
        let dog_id = dog_id.into();
        let added = {
            let mut inner = self.state().await;
            if inner.favorites.contains(&dog_id) {
                false
            } else {
                inner.favorites.push(dog_id);
                true
            }
        };
        if added {
            self.notify_change().await;
        }
        added
    }

    /// Removes a favorite. Returns false if it was not present.
    pub async fn remove_favorite(&self, dog_id: &str) -> bool {
        let removed = {
            let mut inner = self.state().await;
            match inner.favorites.iter().position(|id| id == dog_id) {
                Some(index) => {
                    inner.favorites.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.notify_change().await;
        }
        removed
    }

    /// Removes every favorite.
    pub async fn clear_favorites(&self) {
        {
            let mut inner = self.state().await;
            inner.favorites.clear();
            inner.matched = None;
        }
        self.notify_change().await;
    }

    /// Submits the favorites and returns the dog the service picked.
    ///
    /// With no favorites nothing is sent. Failures are logged and yield
    /// `None`.
    pub async fn match_favorites(&self) -> Option<Dog> {
        let favorites = self.favorites().await;
        if favorites.is_empty() {
            info!("No favorites to match");
            return None;
        }

        let dog = match self.api.match_dogs(&favorites).await {
            Ok(matched) => {
                info!(dog_id = %matched.dog_id, "Match found");
                self.fetch_matched(&matched.dog_id).await
            }
            Err(e) => {
                error!(error = %e, "Error matching dogs");
                None
            }
        };

        // A failed attempt must not leave an earlier match on display.
        self.state().await.matched.clone_from(&dog);
        self.notify_change().await;
        dog
    }

    async fn fetch_matched(&self, dog_id: &str) -> Option<Dog> {
        let ids = [dog_id.to_string()];
        match self.api.fetch_dogs(&ids).await {
            Ok(dogs) => {
                let dog = dogs.into_iter().find(|d| d.id == dog_id);
                if dog.is_none() {
                    warn!(dog_id, "Matched dog not returned by the service");
                }
                dog
            }
            Err(e) => {
                error!(error = %e, "Error fetching matched dog");
                None
            }
        }
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================
