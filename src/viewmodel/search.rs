//! Search screen state
//!
//! Every distinct query gets its own pager and a generation number. The
//! published `SearchSnapshot` only ever moves forward in generation: a
//! forwarder for an older query is refused by `send_if_modified` once a
//! newer generation has been published, so a superseded pager can never
//! leak results into the current one.

use crate::model::MovieSummary;
use crate::paging::{Pager, PagerConfig, PagerSnapshot, SearchMoviesSource};
use crate::repository::MovieRepository;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What the search screen renders
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    /// Query the results belong to
    pub query: String,
    /// Increments on every accepted query change
    pub generation: u64,
    pub pager: PagerSnapshot<MovieSummary>,
}

impl SearchSnapshot {
    fn idle() -> Self {
        Self {
            query: String::new(),
            generation: 0,
            pager: PagerSnapshot::empty(),
        }
    }
}

struct ActiveSearch {
    pager: Arc<Pager<MovieSummary>>,
    forwarder: JoinHandle<()>,
}

impl ActiveSearch {
    fn stop(self) {
        self.forwarder.abort();
        self.pager.close();
    }
}

struct SearchState {
    query: String,
    generation: u64,
    active: Option<ActiveSearch>,
    disposed: bool,
}

/// Owns the pager for the current query and replaces it on query change
pub struct SearchMoviesViewModel<R> {
    repository: R,
    config: PagerConfig,
    state: Mutex<SearchState>,
    snapshots: Arc<watch::Sender<SearchSnapshot>>,
}

impl<R> SearchMoviesViewModel<R>
where
    R: MovieRepository + Clone + 'static,
{
    /// Create an idle holder; nothing is fetched until a query arrives
    pub fn create(repository: R, page_size: usize) -> Self {
        Self::with_config(repository, PagerConfig::new(page_size))
    }

    /// Create with explicit pager tuning for every query's pager
    pub fn with_config(repository: R, config: PagerConfig) -> Self {
        let (snapshots, _) = watch::channel(SearchSnapshot::idle());
        Self {
            repository,
            config,
            state: Mutex::new(SearchState {
                query: String::new(),
                generation: 0,
                active: None,
                disposed: false,
            }),
            snapshots: Arc::new(snapshots),
        }
    }

    /// Switch to `query`, discarding the previous pager and its in-flight
    /// load. Must be called inside a tokio runtime.
    ///
    /// Repeating the current query is a no-op. A blank query publishes an
    /// empty settled snapshot without touching the network.
    pub fn on_query_change(&self, query: impl Into<String>) {
        let query = query.into();
        let mut state = self.lock();
        if state.disposed {
            debug!("search view model disposed, query ignored");
            return;
        }
        if state.query == query {
            debug!(%query, "query unchanged");
            return;
        }

        state.generation += 1;
        let generation = state.generation;
        state.query.clone_from(&query);
        if let Some(previous) = state.active.take() {
            previous.stop();
        }

        if query.trim().is_empty() {
            debug!(generation, "blank query, results cleared");
            self.snapshots.send_replace(SearchSnapshot {
                query,
                generation,
                pager: PagerSnapshot::empty(),
            });
            return;
        }

        info!(%query, generation, "starting search");
        let pager = Arc::new(Pager::new(
            self.config,
            SearchMoviesSource::new(self.repository.clone(), query.clone()),
        ));
        self.snapshots.send_replace(SearchSnapshot {
            query: query.clone(),
            generation,
            pager: pager.snapshot(),
        });
        let forwarder = tokio::spawn(forward(
            pager.subscribe(),
            Arc::clone(&self.snapshots),
            query,
            generation,
        ));
        state.active = Some(ActiveSearch { pager, forwarder });
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Read-position signal for the current results
    pub fn access(&self, index: usize) {
        if let Some(pager) = self.current_pager() {
            pager.access(index);
        }
    }

    pub fn retry(&self) {
        if let Some(pager) = self.current_pager() {
            pager.retry();
        }
    }

    /// Wait until the current query's pager has settled and its final
    /// state has been published, or a newer query has taken over
    pub async fn settled(&self) -> SearchSnapshot {
        let generation = self.generation();
        let Some(pager) = self.current_pager() else {
            return self.snapshot();
        };
        let Some(target) = pager.settled().await else {
            return self.snapshot();
        };

        let mut rx = self.snapshots.subscribe();
        let reached = rx
            .wait_for(|s| {
                s.generation > generation
                    || (s.generation == generation
                        && Arc::ptr_eq(&s.pager.items, &target.items)
                        && s.pager.refresh == target.refresh
                        && s.pager.append == target.append)
            })
            .await
            .map(|s| s.clone());
        reached.unwrap_or_else(|_| self.snapshot())
    }

    /// Stop the current pager and refuse further queries
    pub fn dispose(&self) {
        let mut state = self.lock();
        state.disposed = true;
        if let Some(active) = state.active.take() {
            active.stop();
        }
        debug!("search view model disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    fn current_pager(&self) -> Option<Arc<Pager<MovieSummary>>> {
        self.lock()
            .active
            .as_ref()
            .map(|active| Arc::clone(&active.pager))
    }
}

impl<R> SearchMoviesViewModel<R> {
    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> Drop for SearchMoviesViewModel<R> {
    fn drop(&mut self) {
        if let Some(active) = self.lock().active.take() {
            active.stop();
        }
    }
}

impl<R> std::fmt::Debug for SearchMoviesViewModel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SearchMoviesViewModel")
            .field("query", &state.query)
            .field("generation", &state.generation)
            .field("active", &state.active.is_some())
            .field("disposed", &state.disposed)
            .finish_non_exhaustive()
    }
}

/// Republish one pager's snapshots under its generation until it closes
/// or a newer generation owns the channel
async fn forward(
    mut pager: watch::Receiver<PagerSnapshot<MovieSummary>>,
    snapshots: Arc<watch::Sender<SearchSnapshot>>,
    query: String,
    generation: u64,
) {
    loop {
        let latest = pager.borrow_and_update().clone();
        let published = snapshots.send_if_modified(|current| {
            if current.generation != generation {
                return false;
            }
            current.query.clone_from(&query);
            current.pager = latest;
            true
        });
        if !published {
            debug!(generation, "search superseded, forwarder stopping");
            break;
        }
        if pager.changed().await.is_err() {
            break;
        }
    }
}
