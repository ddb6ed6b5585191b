//! Service endpoints.

use reqwest::Method;
use std::fmt;

/// An endpoint of the dogs service.
///
/// Used to build request URLs and to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /auth/login`
    Login,
    /// `GET /dogs/breeds`
    Breeds,
    /// `GET /dogs/search`
    Search,
    /// `POST /dogs`
    Dogs,
    /// `POST /dogs/match`
    Match,
}

impl Endpoint {
    /// Path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "auth/login",
            Self::Breeds => "dogs/breeds",
            Self::Search => "dogs/search",
            Self::Dogs => "dogs",
            Self::Match => "dogs/match",
        }
    }

    /// HTTP method used for this endpoint.
    pub fn method(&self) -> Method {
        match self {
            Self::Breeds | Self::Search => Method::GET,
            Self::Login | Self::Dogs | Self::Match => Method::POST,
        }
    }

    /// Generic failure message reported for non-success responses.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Login => "Login failed.",
            Self::Breeds => "Failed to fetch breeds.",
            Self::Search => "Failed to search dogs.",
            Self::Dogs => "Failed to fetch dog details.",
            Self::Match => "Failed to match dogs.",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Endpoint::Login.to_string(), "POST /auth/login");
        assert_eq!(Endpoint::Search.to_string(), "GET /dogs/search");
    }
}
