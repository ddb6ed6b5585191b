//! Session state: who is logged in and whether the service still agrees.
//!
//! [`SessionState`] holds the authoritative fields and is shared with the
//! API client as its [`SessionObserver`], so a 401 from any call clears the
//! session and sends the user back to login before the failing call returns.
//! [`SessionStore`] adds the login, logout and verification actions on top.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pawmatch_core::User;
use pawmatch_fetch::{ApiError, DogApi, Endpoint, SessionObserver};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{error, info, warn};

use crate::navigator::{Navigator, Route};

// ============================================================================
// Session State
// ============================================================================

#[derive(Debug, Default)]
struct SessionInner {
    is_authenticated: bool,
    user: Option<User>,
    last_verified: Option<DateTime<Utc>>,
}

/// Shared handle to the session fields.
#[derive(Debug, Clone)]
pub struct SessionState {
    inner: Arc<RwLock<SessionInner>>,
    navigator: Navigator,
    ended: Arc<watch::Sender<u64>>,
}

impl SessionState {
    /// Creates an unauthenticated session.
    pub fn new(navigator: Navigator) -> Self {
        let (ended, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(SessionInner::default())),
            navigator,
            ended: Arc::new(ended),
        }
    }

    /// Returns true while the user is logged in.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated
    }

    /// Returns the logged-in user.
    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.user.clone()
    }

    /// Returns when the session was last confirmed by the service.
    pub async fn last_verified(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_verified
    }

    /// The navigator this session redirects through.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Subscribes to session ends.
    ///
    /// The value is a counter bumped every time the session is cleared by
    /// logout, failed verification or expiry.
    pub fn subscribe_ended(&self) -> watch::Receiver<u64> {
        self.ended.subscribe()
    }

    async fn establish(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.is_authenticated = true;
        inner.user = Some(user);
        inner.last_verified = Some(Utc::now());
    }

    /// Clears both fields and sends the user to the login route.
    pub async fn end(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.is_authenticated = false;
            inner.user = None;
            inner.last_verified = None;
        }
        self.ended.send_modify(|count| *count += 1);
        self.navigator.push(Route::Login);
    }
}

#[async_trait]
impl SessionObserver for SessionState {
    async fn session_expired(&self, endpoint: Endpoint) {
        warn!(%endpoint, "Session expired. Redirecting to login.");
        self.end().await;
    }
}

// ============================================================================
// Session Store
// ============================================================================

/// Login, logout and session verification.
#[derive(Clone)]
pub struct SessionStore {
    state: SessionState,
    api: Arc<dyn DogApi>,
}

impl SessionStore {
    /// Creates a store acting on `state` through `api`.
    pub fn new(state: SessionState, api: Arc<dyn DogApi>) -> Self {
        Self { state, api }
    }

    /// The shared session fields.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Logs in.
    ///
    /// Only a successful call sets the user and navigates to search.
    ///
    /// # Errors
    ///
    /// Returns the service error when login is rejected; session fields are
    /// left untouched.
    pub async fn login(&self, name: &str, email: &str) -> Result<(), ApiError> {
        if let Err(e) = self.api.login(name, email).await {
            error!(error = %e, "Login failed");
            return Err(e);
        }

        self.state.establish(User::new(name, email)).await;
        info!(user = %name, "Logged in");
        self.state.navigator.push(Route::Search);
        Ok(())
    }

    /// Logs out. Never fails.
    pub async fn logout(&self) {
        self.state.end().await;
        info!("Logged out");
    }

    /// Confirms the session with a harmless authenticated call.
    ///
    /// Any failure counts as "not authenticated": the session is cleared and
    /// the user is sent to login. Returns the resulting authentication flag.
    pub async fn verify_authentication(&self) -> bool {
        match self.api.fetch_breeds().await {
            Ok(_) => {
                let mut inner = self.state.inner.write().await;
                inner.is_authenticated = true;
                inner.last_verified = Some(Utc::now());
                true
            }
            Err(e) => {
                warn!(error = %e, "Session verification failed");
                self.state.end().await;
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
