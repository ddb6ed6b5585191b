//! In-memory dogs service for store tests.

use async_trait::async_trait;
use pawmatch_core::{Dog, DogSearchQuery, DogSearchResult, Match};
use pawmatch_fetch::{ApiError, DogApi, Endpoint, SessionObserver};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub(crate) fn dog(id: &str, breed: &str, age: u32) -> Dog {
    Dog {
        id: id.to_string(),
        img: format!("https://img.example/{id}.jpg"),
        name: format!("Dog {id}"),
        age,
        zip_code: "10001".to_string(),
        breed: breed.to_string(),
    }
}

/// `count` dogs of one breed with ids `{prefix}0..`.
pub(crate) fn kennel(prefix: &str, breed: &str, count: usize) -> Vec<Dog> {
    (0..count)
        .map(|i| dog(&format!("{prefix}{i}"), breed, u32::try_from(i % 12).unwrap_or(0)))
        .collect()
}

#[derive(Default)]
pub(crate) struct FakeDogApi {
    catalog: Mutex<Vec<Dog>>,
    breeds: Mutex<Vec<String>>,
    queries: Mutex<Vec<DogSearchQuery>>,
    match_requests: Mutex<Vec<Vec<String>>>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    observer: Mutex<Option<Arc<dyn SessionObserver>>>,
    detail_calls: AtomicUsize,
    reject_login: AtomicBool,
    fail_search: AtomicBool,
    fail_details: AtomicBool,
    expired: AtomicBool,
}

impl FakeDogApi {
    pub(crate) fn with_catalog(dogs: Vec<Dog>) -> Arc<Self> {
        let api = Self::default();
        let mut breeds: Vec<String> = dogs.iter().map(|d| d.breed.clone()).collect();
        breeds.sort();
        breeds.dedup();
        *api.breeds.lock().unwrap() = breeds;
        *api.catalog.lock().unwrap() = dogs;
        Arc::new(api)
    }

    pub(crate) fn set_observer(&self, observer: Arc<dyn SessionObserver>) {
        *self.observer.lock().unwrap() = Some(observer);
    }

    /// Holds the next search call until the returned sender fires.
    pub(crate) fn hold_next_search(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub(crate) fn reject_login(&self, value: bool) {
        self.reject_login.store(value, Ordering::SeqCst);
    }

    pub(crate) fn fail_search(&self, value: bool) {
        self.fail_search.store(value, Ordering::SeqCst);
    }

    pub(crate) fn fail_details(&self, value: bool) {
        self.fail_details.store(value, Ordering::SeqCst);
    }

    pub(crate) fn expire_session(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub(crate) fn last_query(&self) -> Option<DogSearchQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    pub(crate) fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn match_requests(&self) -> Vec<Vec<String>> {
        self.match_requests.lock().unwrap().clone()
    }

    /// Waits until `n` search calls have been made.
    pub(crate) async fn wait_for_searches(&self, n: usize) {
        while self.search_calls() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn check_session(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        if !self.expired.load(Ordering::SeqCst) {
            return Ok(());
        }
        let observer = self.observer.lock().unwrap().clone();
        if let Some(observer) = observer {
            observer.session_expired(endpoint).await;
        }
        Err(ApiError::SessionExpired { endpoint })
    }

    fn failed(endpoint: Endpoint, status: u16) -> ApiError {
        ApiError::RequestFailed {
            endpoint,
            status,
            message: endpoint.failure_message().to_string(),
        }
    }
}

#[async_trait]
impl DogApi for FakeDogApi {
    async fn login(&self, _name: &str, _email: &str) -> Result<(), ApiError> {
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(Self::failed(Endpoint::Login, 400));
        }
        self.expired.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_breeds(&self) -> Result<Vec<String>, ApiError> {
        self.check_session(Endpoint::Breeds).await?;
        Ok(self.breeds.lock().unwrap().clone())
    }

    async fn search_dogs(&self, query: &DogSearchQuery) -> Result<DogSearchResult, ApiError> {
        self.queries.lock().unwrap().push(query.clone());

        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.check_session(Endpoint::Search).await?;
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(Self::failed(Endpoint::Search, 500));
        }

        let matching: Vec<String> = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|d| query.breeds.as_ref().is_none_or(|b| b.contains(&d.breed)))
            .filter(|d| query.age_min.is_none_or(|min| d.age >= min))
            .filter(|d| query.age_max.is_none_or(|max| d.age <= max))
            .map(|d| d.id.clone())
            .collect();

        let from = query.from.unwrap_or(0);
        let size = query.size.unwrap_or(25);
        Ok(DogSearchResult {
            result_ids: matching.iter().skip(from).take(size).cloned().collect(),
            total: matching.len(),
            next: None,
            prev: None,
        })
    }

    async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, ApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check_session(Endpoint::Dogs).await?;
        if self.fail_details.load(Ordering::SeqCst) {
            return Err(Self::failed(Endpoint::Dogs, 500));
        }
        let catalog = self.catalog.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| catalog.iter().find(|d| &d.id == id).cloned())
            .collect())
    }

    async fn match_dogs(&self, ids: &[String]) -> Result<Match, ApiError> {
        self.match_requests.lock().unwrap().push(ids.to_vec());
        self.check_session(Endpoint::Match).await?;
        ids.last()
            .map(|id| Match { dog_id: id.clone() })
            .ok_or_else(|| Self::failed(Endpoint::Match, 400))
    }
}
