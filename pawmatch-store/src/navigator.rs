//! Route changes requested by the stores.
//!
//! Stores never render anything; they publish the route the front end should
//! show and the front end follows it.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// A screen of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    /// Login form.
    #[default]
    Login,
    /// Dog search, results and favorites.
    Search,
}

impl Route {
    /// Path of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Search => "/search",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Search => write!(f, "Search"),
        }
    }
}

/// Publishes the current route.
#[derive(Debug, Clone)]
pub struct Navigator {
    route: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Creates a navigator showing the login route.
    pub fn new() -> Self {
        let (route, _) = watch::channel(Route::Login);
        Self {
            route: Arc::new(route),
        }
    }

    /// Navigates to `route`.
    pub fn push(&self, route: Route) {
        debug!(%route, path = route.path(), "Navigating");
        self.route.send_replace(route);
    }

    /// Returns the current route.
    pub fn current(&self) -> Route {
        *self.route.borrow()
    }

    /// Subscribes to route changes.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_login() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.current().path(), "/");
    }

    #[tokio::test]
    async fn test_push_notifies_subscribers() {
        let nav = Navigator::new();
        let mut rx = nav.subscribe();

        nav.clone().push(Route::Search);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Route::Search);
        assert_eq!(nav.current().path(), "/search");
    }
}
