//! Popular movies screen state

use crate::model::MovieSummary;
use crate::paging::{Pager, PagerConfig, PagerSnapshot, PopularMoviesSource};
use crate::repository::MovieRepository;
use futures::Stream;
use tokio::sync::watch;
use tracing::debug;

/// Owns one pager over the popular listing for its whole lifetime
#[derive(Debug)]
pub struct PopularMoviesViewModel {
    pager: Pager<MovieSummary>,
}

impl PopularMoviesViewModel {
    /// Start loading the first page. Must be called inside a tokio runtime.
    pub fn create<R>(repository: R, page_size: usize) -> Self
    where
        R: MovieRepository + 'static,
    {
        Self::with_config(repository, PagerConfig::new(page_size))
    }

    pub fn with_config<R>(repository: R, config: PagerConfig) -> Self
    where
        R: MovieRepository + 'static,
    {
        debug!(page_size = config.page_size, "creating popular movies view model");
        Self {
            pager: Pager::new(config, PopularMoviesSource::new(repository)),
        }
    }

    pub fn pager(&self) -> &Pager<MovieSummary> {
        &self.pager
    }

    pub fn snapshot(&self) -> PagerSnapshot<MovieSummary> {
        self.pager.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<PagerSnapshot<MovieSummary>> {
        self.pager.subscribe()
    }

    pub fn updates(&self) -> impl Stream<Item = PagerSnapshot<MovieSummary>> + Send + 'static {
        self.pager.updates()
    }

    /// Read-position signal from the list
    pub fn access(&self, index: usize) {
        self.pager.access(index);
    }

    pub fn refresh(&self) {
        self.pager.refresh();
    }

    pub fn retry(&self) {
        self.pager.retry();
    }

    /// Wait for queued signals to be handled and loading to stop
    pub async fn settled(&self) -> Option<PagerSnapshot<MovieSummary>> {
        self.pager.settled().await
    }

    /// Tear down the pager; an in-flight page is discarded
    pub fn dispose(&self) {
        debug!("disposing popular movies view model");
        self.pager.close();
    }

    pub fn is_disposed(&self) -> bool {
        self.pager.is_closed()
    }
}
