//! HTTP client for the dogs service.
//!
//! Wraps reqwest with:
//! - A cookie jar, so the session cookie set by login is resent on every call
//! - Request/response tracing
//! - Uniform status handling (401 goes to the session observer)

use async_trait::async_trait;
use pawmatch_core::{Dog, DogSearchQuery, DogSearchResult, LoginRequest, Match};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::api::{DogApi, SessionObserver};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::settings::FetchSettings;

/// User agent string for PawMatch.
const USER_AGENT: &str = concat!("PawMatch/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// API Client
// ============================================================================

/// Client for the dogs service.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: Url,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client with its own cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the underlying HTTP
    /// client cannot be built (broken TLS configuration).
    pub fn new(settings: &FetchSettings) -> Result<Self, ApiError> {
        let base_url = settings.parsed_base_url()?;

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            base_url,
            observer: None,
        })
    }

    /// Registers the observer told about 401 responses.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.path())
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn request(&self, endpoint: Endpoint) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.request(endpoint.method(), self.url(endpoint)?))
    }

    /// Sends a request and checks its status.
    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%endpoint, %status, "Response received");

        if status.is_success() {
            return Ok(response);
        }

        // Body is only read for its error message.
        let body = response.text().await.unwrap_or_default();
        Err(self.reject(endpoint, status, &body).await)
    }

    /// Converts a non-success status into an error, notifying the observer
    /// first when the session has expired.
    async fn reject(&self, endpoint: Endpoint, status: StatusCode, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            warn!(%endpoint, "Session expired");
            if let Some(observer) = &self.observer {
                observer.session_expired(endpoint).await;
            }
            return ApiError::SessionExpired { endpoint };
        }

        let message = match endpoint {
            Endpoint::Login => error_message(body),
            _ => None,
        }
        .unwrap_or_else(|| endpoint.failure_message().to_string());

        ApiError::RequestFailed {
            endpoint,
            status: status.as_u16(),
            message,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: Endpoint,
        response: Response,
    ) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

/// Best-effort extraction of `{"message": "..."}` from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl DogApi for ApiClient {
    #[instrument(skip(self, email))]
    async fn login(&self, name: &str, email: &str) -> Result<(), ApiError> {
        let body = LoginRequest { name, email };
        let request = self.request(Endpoint::Login)?.json(&body);
        self.send(Endpoint::Login, request).await?;
        debug!("Login accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_breeds(&self) -> Result<Vec<String>, ApiError> {
        let request = self.request(Endpoint::Breeds)?;
        let response = self.send(Endpoint::Breeds, request).await?;
        Self::read_json(Endpoint::Breeds, response).await
    }

    #[instrument(skip(self, query), fields(query = %query.to_query_string()))]
    async fn search_dogs(&self, query: &DogSearchQuery) -> Result<DogSearchResult, ApiError> {
        let request = self.request(Endpoint::Search)?.query(&query.to_pairs());
        let response = self.send(Endpoint::Search, request).await?;
        Self::read_json(Endpoint::Search, response).await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, ApiError> {
        let request = self.request(Endpoint::Dogs)?.json(ids);
        let response = self.send(Endpoint::Dogs, request).await?;
        Self::read_json(Endpoint::Dogs, response).await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn match_dogs(&self, ids: &[String]) -> Result<Match, ApiError> {
        let request = self.request(Endpoint::Match)?.json(ids);
        let response = self.send(Endpoint::Match, request).await?;
        Self::read_json(Endpoint::Match, response).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<Endpoint>>,
    }

    #[async_trait]
    impl SessionObserver for RecordingObserver {
        async fn session_expired(&self, endpoint: Endpoint) {
            self.seen.lock().unwrap().push(endpoint);
        }
    }

    fn client() -> ApiClient {
        ApiClient::new(&FetchSettings::default()).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = ApiClient::new(
            &FetchSettings::default().with_base_url("http://localhost:3000/v1"),
        )
        .unwrap();

        assert_eq!(
            client.url(Endpoint::Login).unwrap().as_str(),
            "http://localhost:3000/v1/auth/login"
        );
        assert_eq!(
            client.url(Endpoint::Dogs).unwrap().as_str(),
            "http://localhost:3000/v1/dogs"
        );
        assert_eq!(
            client.url(Endpoint::Match).unwrap().as_str(),
            "http://localhost:3000/v1/dogs/match"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new(&FetchSettings::default().with_base_url("::"));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unauthorized_notifies_observer_before_returning() {
        let observer = Arc::new(RecordingObserver::default());
        let client = client().with_observer(observer.clone());

        let err = client
            .reject(Endpoint::Search, StatusCode::UNAUTHORIZED, "Unauthorized")
            .await;

        assert!(err.is_session_expired());
        assert_eq!(err.endpoint(), Some(Endpoint::Search));
        assert_eq!(*observer.seen.lock().unwrap(), vec![Endpoint::Search]);
    }

    #[tokio::test]
    async fn test_unauthorized_without_observer() {
        let err = client()
            .reject(Endpoint::Breeds, StatusCode::UNAUTHORIZED, "")
            .await;
        assert!(err.is_session_expired());
    }

    #[tokio::test]
    async fn test_other_statuses_are_generic_failures() {
        let observer = Arc::new(RecordingObserver::default());
        let client = client().with_observer(observer.clone());

        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let err = client.reject(Endpoint::Search, status, "{}").await;
            match err {
                ApiError::RequestFailed {
                    endpoint,
                    status: code,
                    message,
                } => {
                    assert_eq!(endpoint, Endpoint::Search);
                    assert_eq!(code, status.as_u16());
                    assert_eq!(message, "Failed to search dogs.");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        assert!(observer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_failure_uses_body_message() {
        let err = client()
            .reject(
                Endpoint::Login,
                StatusCode::BAD_REQUEST,
                r#"{"message": "email is required"}"#,
            )
            .await;
        assert_eq!(err.to_string(), "email is required");

        let err = client()
            .reject(Endpoint::Login, StatusCode::BAD_REQUEST, "<html>oops</html>")
            .await;
        assert_eq!(err.to_string(), "Login failed.");
    }

    #[tokio::test]
    async fn test_non_login_failure_ignores_body_message() {
        let err = client()
            .reject(
                Endpoint::Match,
                StatusCode::BAD_REQUEST,
                r#"{"message": "too many ids"}"#,
            )
            .await;
        assert_eq!(err.to_string(), "Failed to match dogs.");
    }

    // ------------------------------------------------------------------------
    // Loopback server
    // ------------------------------------------------------------------------

    /// Raw requests received by the loopback server, lowercased.
    type Received = Arc<Mutex<Vec<String>>>;

    fn response(status: &str, headers: &[&str], body: &str) -> String {
        let mut out = format!("HTTP/1.1 {status}\r\n");
        for header in headers {
            out.push_str(header);
            out.push_str("\r\n");
        }
        out.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ));
        out
    }

    /// Serves one canned response per connection, in order.
    async fn serve(responses: Vec<String>) -> (String, Received) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let received = Received::default();

        let log = received.clone();
        tokio::spawn(async move {
            for reply in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (base_url, received)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_lowercase();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_lowercase()
    }

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&FetchSettings::default().with_base_url(base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_query_string() {
        let (base_url, received) = serve(vec![response(
            "200 OK",
            &[],
            r#"{"resultIds":["a1","a2"],"total":2}"#,
        )])
        .await;
        let query = DogSearchQuery {
            breeds: Some(vec!["Labrador".to_string(), "Poodle".to_string()]),
            size: Some(10),
            from: Some(0),
            sort: Some("breed:asc".to_string()),
            ..DogSearchQuery::default()
        };

        let result = client_for(&base_url).search_dogs(&query).await.unwrap();

        assert_eq!(result.result_ids, vec!["a1", "a2"]);
        assert_eq!(result.total, 2);
        let request = received.lock().unwrap()[0].clone();
        let line = request.lines().next().unwrap();
        assert!(line.starts_with("get /dogs/search?"), "{line}");
        assert!(line.contains("breeds=labrador%2cpoodle"), "{line}");
        assert!(line.contains("size=10"), "{line}");
        assert!(line.contains("from=0"), "{line}");
        assert!(line.contains("sort=breed%3aasc"), "{line}");
    }

    #[tokio::test]
    async fn test_login_cookie_is_resent() {
        let (base_url, received) = serve(vec![
            response(
                "200 OK",
                &["Set-Cookie: fetch-access-token=abc; Path=/; HttpOnly"],
                "",
            ),
            response("200 OK", &[], r#"["Beagle","Poodle"]"#),
        ])
        .await;
        let client = client_for(&base_url);

        client.login("Ada", "ada@example.com").await.unwrap();
        let breeds = client.fetch_breeds().await.unwrap();

        assert_eq!(breeds, vec!["Beagle", "Poodle"]);
        let requests = received.lock().unwrap().clone();
        assert!(requests[0].starts_with("post /auth/login "));
        assert!(requests[0].contains(r#""name":"ada""#));
        assert!(requests[0].contains(r#""email":"ada@example.com""#));
        assert!(requests[1].starts_with("get /dogs/breeds "));
        assert!(requests[1].contains("cookie: fetch-access-token=abc"));
    }

    #[tokio::test]
    async fn test_unauthorized_response_reaches_observer() {
        let (base_url, _received) =
            serve(vec![response("401 Unauthorized", &[], "Unauthorized")]).await;
        let observer = Arc::new(RecordingObserver::default());
        let client = client_for(&base_url).with_observer(observer.clone());

        let err = client
            .match_dogs(&["a1".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::SessionExpired {
                endpoint: Endpoint::Match
            }
        ));
        assert_eq!(*observer.seen.lock().unwrap(), vec![Endpoint::Match]);
    }

    #[tokio::test]
    async fn test_server_error_status_is_checked() {
        let (base_url, _received) =
            serve(vec![response("500 Internal Server Error", &[], "{}")]).await;

        let err = client_for(&base_url).fetch_breeds().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch breeds.");
        assert!(!err.is_session_expired());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let (base_url, _received) =
            serve(vec![response("200 OK", &[], r#"{"resultIds":"#)]).await;

        let err = client_for(&base_url)
            .search_dogs(&DogSearchQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Decode {
                endpoint: Endpoint::Search,
                ..
            }
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"nope"}"#).as_deref(), Some("nope"));
        assert!(error_message(r#"{"message":""}"#).is_none());
        assert!(error_message(r#"{"error":"nope"}"#).is_none());
        assert!(error_message("plain text").is_none());
    }
}
