//! Scripted in-memory repository for unit tests

use crate::error::{Error, Result};
use crate::model::{MovieDetail, MovieId, MovieSummary, PageEnvelope, RecommendationSummary};
use crate::repository::MovieRepository;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Identifies one repository call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Call {
    Popular(u32),
    Search(String, u32),
    Detail(MovieId),
    Recommendations(MovieId),
}

/// Scripted response for a listing call
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Movies(Vec<MovieSummary>),
    Status(u16),
    Offline,
    Malformed,
}

impl Outcome {
    fn into_result(self, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        match self {
            Outcome::Movies(movies) => Ok(PageEnvelope::new(page, movies)),
            Outcome::Status(status) => Err(Error::http_status(status, "scripted failure")),
            Outcome::Offline => Err(Error::network("offline")),
            Outcome::Malformed => Err(Error::decode("missing field `results`")),
        }
    }
}

/// Movies with ids taken from `ids`, titled "Movie <id>"
pub(crate) fn movies(ids: impl IntoIterator<Item = u64>) -> Vec<MovieSummary> {
    ids.into_iter()
        .map(|id| MovieSummary::new(id, format!("Movie {id}")))
        .collect()
}

pub(crate) fn detail(id: MovieId, title: &str) -> MovieDetail {
    MovieDetail {
        summary: MovieSummary::new(id, title),
        runtime: Some(120),
        tagline: None,
        genres: Vec::new(),
        spoken_languages: Vec::new(),
        status: None,
        budget: 0,
        revenue: 0,
        homepage: None,
        imdb_id: None,
    }
}

/// Repository whose answers are scripted per call.
///
/// Each call pops the next scripted outcome; the last one is sticky.
/// Unscripted listing pages are empty. A gate holds matching calls until
/// the test adds permits.
#[derive(Default)]
pub(crate) struct FakeRepository {
    outcomes: Mutex<HashMap<Call, VecDeque<Outcome>>>,
    details: Mutex<HashMap<MovieId, MovieDetail>>,
    gates: Mutex<HashMap<Call, Arc<Semaphore>>>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRepository {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn script(&self, call: Call, outcome: Outcome) -> &Self {
        self.outcomes
            .lock()
            .unwrap()
            .entry(call)
            .or_default()
            .push_back(outcome);
        self
    }

    pub(crate) fn add_detail(&self, detail: MovieDetail) {
        self.details.lock().unwrap().insert(detail.id(), detail);
    }

    /// Hold every `call` until permits are added to the returned semaphore
    pub(crate) fn gate(&self, call: Call) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.lock().unwrap().insert(call, Arc::clone(&gate));
        gate
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: &Call) -> InFlightGuard<'_> {
        self.calls.lock().unwrap().push(call.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlightGuard(&self.in_flight);

        let gate = self.gates.lock().unwrap().get(call).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire_owned().await {
                permit.forget();
            }
        }
        guard
    }

    fn next_outcome(&self, call: &Call) -> Outcome {
        let mut outcomes = self.outcomes.lock().unwrap();
        match outcomes.get_mut(call) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Outcome::Movies(Vec::new())),
            None => Outcome::Movies(Vec::new()),
        }
    }

    async fn listing(&self, call: Call, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        let _guard = self.enter(&call).await;
        self.next_outcome(&call).into_result(page)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MovieRepository for FakeRepository {
    async fn fetch_popular(&self, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        self.listing(Call::Popular(page), page).await
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail> {
        let _guard = self.enter(&Call::Detail(id)).await;
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("movie {id}")))
    }

    async fn fetch_recommendations(
        &self,
        id: MovieId,
    ) -> Result<PageEnvelope<RecommendationSummary>> {
        self.listing(Call::Recommendations(id), 1).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        self.listing(Call::Search(query.to_string(), page), page).await
    }
}
