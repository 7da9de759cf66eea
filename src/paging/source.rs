//! Paging sources
//!
//! A source turns a page key into one page of items. It keeps no state
//! between loads apart from its fixed inputs (the search query), so a
//! failed page is simply requested again on the next load.

use super::types::{LoadParams, LoadResult, Page, PageKey, PagingState, FIRST_PAGE};
use crate::error::Result;
use crate::model::{MovieSummary, PageEnvelope};
use crate::repository::MovieRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads pages for a pager
#[async_trait]
pub trait PagingSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Load the page at `params.key` (`None` = first page)
    async fn load(&self, params: LoadParams) -> LoadResult<Self::Item>;

    /// Key to resume from when reloading around `state.anchor_position`.
    ///
    /// Uses the page closest to the anchor: `prev_key + 1`, else
    /// `next_key - 1`. `None` restarts from the first page.
    fn refresh_key(&self, state: &PagingState) -> Option<PageKey> {
        let anchor = state.anchor_position?;
        let page = state.closest_page_to_position(anchor)?;
        page.prev_key
            .and_then(|key| key.checked_add(1))
            .or_else(|| page.next_key.and_then(|key| key.checked_sub(1)))
            .filter(|key| *key >= FIRST_PAGE)
    }
}

/// Popular movies listing
#[derive(Debug, Clone)]
pub struct PopularMoviesSource<R> {
    repository: R,
}

impl<R: MovieRepository> PopularMoviesSource<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: MovieRepository + 'static> PagingSource for PopularMoviesSource<R> {
    type Item = MovieSummary;

    async fn load(&self, params: LoadParams) -> LoadResult<MovieSummary> {
        let page = params.key.unwrap_or(FIRST_PAGE);
        let result = self.repository.fetch_popular(page).await;
        into_load_result("popular", page, result)
    }
}

/// Search results for one fixed query
#[derive(Debug, Clone)]
pub struct SearchMoviesSource<R> {
    repository: R,
    query: String,
}

impl<R: MovieRepository> SearchMoviesSource<R> {
    pub fn new(repository: R, query: impl Into<String>) -> Self {
        Self {
            repository,
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[async_trait]
impl<R: MovieRepository + 'static> PagingSource for SearchMoviesSource<R> {
    type Item = MovieSummary;

    async fn load(&self, params: LoadParams) -> LoadResult<MovieSummary> {
        let page = params.key.unwrap_or(FIRST_PAGE);
        let result = self.repository.search(&self.query, page).await;
        into_load_result("search", page, result)
    }
}

/// Shared mapping from a repository response to a page.
///
/// Server order is kept as is. An empty page ends the stream.
fn into_load_result<T>(
    source: &'static str,
    requested: PageKey,
    result: Result<PageEnvelope<T>>,
) -> LoadResult<T> {
    match result {
        Ok(envelope) => {
            let next_key = if envelope.results.is_empty() {
                None
            } else {
                requested.checked_add(1)
            };
            debug!(
                source,
                page = requested,
                items = envelope.results.len(),
                ?next_key,
                "page loaded"
            );
            LoadResult::Page(Page {
                data: envelope.results,
                prev_key: None,
                next_key,
            })
        }
        Err(e) => {
            warn!(source, page = requested, error = %e, "page load failed");
            LoadResult::Error(Arc::new(e))
        }
    }
}
