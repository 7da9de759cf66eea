//! Single-fetch screen state (movie detail, recommendations)

use crate::error::{Error, Result};
use crate::model::{MovieDetail, MovieId, RecommendationSummary};
use crate::repository::MovieRepository;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// State of a value fetched in one request
#[derive(Debug, Clone, Default)]
pub enum Resource<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(Arc<Error>),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Resource::Failed(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Runs at most one fetch at a time; starting a new one supersedes the old.
///
/// A fetch may only publish while its generation is still current. The
/// check happens inside `send_if_modified`, so it cannot interleave with
/// `start` or `clear` publishing a newer state.
struct Loader<T> {
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<Resource<T>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone + Send + Sync + 'static> Loader<T> {
    fn new() -> Self {
        let (state, _) = watch::channel(Resource::Idle);
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            task: Mutex::new(None),
        }
    }

    fn start<F>(&self, what: String, fetch: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(Resource::Loading);

        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let outcome = match fetch.await {
                Ok(value) => Resource::Ready(value),
                Err(err) => {
                    warn!(%what, error = %err, "fetch failed");
                    Resource::Failed(Arc::new(err))
                }
            };
            let published = state.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *slot = outcome;
                true
            });
            if !published {
                debug!(%what, generation, "stale fetch discarded");
            }
        });
        self.replace_task(Some(task));
    }

    fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.replace_task(None);
        self.state.send_replace(Resource::Idle);
    }

    fn replace_task(&self, task: Option<JoinHandle<()>>) {
        let mut slot = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = std::mem::replace(&mut *slot, task) {
            previous.abort();
        }
    }

    fn current(&self) -> Resource<T> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Resource<T>> {
        self.state.subscribe()
    }

    async fn settled(&self) -> Resource<T> {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|r| !r.is_loading())
            .await
            .map(|r| r.clone());
        settled.unwrap_or_else(|_| self.current())
    }
}

impl<T> Drop for Loader<T> {
    fn drop(&mut self) {
        let slot = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.take() {
            task.abort();
        }
    }
}

/// Detail screen: one movie at a time
pub struct MovieDetailViewModel<R> {
    repository: R,
    loader: Loader<MovieDetail>,
}

impl<R: MovieRepository + Clone + 'static> MovieDetailViewModel<R> {
    pub fn create(repository: R) -> Self {
        Self {
            repository,
            loader: Loader::new(),
        }
    }

    /// Load `id`, superseding any fetch still running
    pub fn fetch(&self, id: MovieId) {
        let repository = self.repository.clone();
        self.loader.start(format!("movie {id}"), async move {
            repository.fetch_detail(id).await
        });
    }

    /// Forget the current movie, back to `Idle`
    pub fn clear(&self) {
        self.loader.clear();
    }

    pub fn state(&self) -> Resource<MovieDetail> {
        self.loader.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<MovieDetail>> {
        self.loader.subscribe()
    }

    pub async fn settled(&self) -> Resource<MovieDetail> {
        self.loader.settled().await
    }
}

/// Recommendations for one movie, fetched as a single batch
pub struct RecommendationsViewModel<R> {
    repository: R,
    loader: Loader<Vec<RecommendationSummary>>,
}

impl<R: MovieRepository + Clone + 'static> RecommendationsViewModel<R> {
    pub fn create(repository: R) -> Self {
        Self {
            repository,
            loader: Loader::new(),
        }
    }

    pub fn fetch(&self, id: MovieId) {
        let repository = self.repository.clone();
        self.loader
            .start(format!("recommendations for {id}"), async move {
                repository
                    .fetch_recommendations(id)
                    .await
                    .map(|envelope| envelope.results)
            });
    }

    pub fn clear(&self) {
        self.loader.clear();
    }

    pub fn state(&self) -> Resource<Vec<RecommendationSummary>> {
        self.loader.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<RecommendationSummary>>> {
        self.loader.subscribe()
    }

    pub async fn settled(&self) -> Resource<Vec<RecommendationSummary>> {
        self.loader.settled().await
    }
}
