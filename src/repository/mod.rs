//! Repository module
//!
//! `MovieRepository` is the only collaborator the paging and view-model
//! layers depend on. `RemoteMovieRepository` forwards to the endpoint
//! client without caching or transformation, so errors arrive unchanged.

mod remote;

pub use remote::RemoteMovieRepository;

use crate::error::Result;
use crate::model::{MovieDetail, MovieId, MovieSummary, PageEnvelope, RecommendationSummary};
use async_trait::async_trait;
use std::sync::Arc;

/// Domain-shaped access to movie data
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// One page of the popular listing (1-based)
    async fn fetch_popular(&self, page: u32) -> Result<PageEnvelope<MovieSummary>>;

    /// Full record for one movie
    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail>;

    /// Recommendations for one movie, single batch
    async fn fetch_recommendations(
        &self,
        id: MovieId,
    ) -> Result<PageEnvelope<RecommendationSummary>>;

    /// One page of search results for `query` (1-based)
    async fn search(&self, query: &str, page: u32) -> Result<PageEnvelope<MovieSummary>>;
}

#[async_trait]
impl<R: MovieRepository + ?Sized> MovieRepository for Arc<R> {
    async fn fetch_popular(&self, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        (**self).fetch_popular(page).await
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail> {
        (**self).fetch_detail(id).await
    }

    async fn fetch_recommendations(
        &self,
        id: MovieId,
    ) -> Result<PageEnvelope<RecommendationSummary>> {
        (**self).fetch_recommendations(id).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        (**self).search(query, page).await
    }
}
