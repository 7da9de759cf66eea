//! Repository backed by the remote API

use super::MovieRepository;
use crate::api::MovieApi;
use crate::error::Result;
use crate::model::{MovieDetail, MovieId, MovieSummary, PageEnvelope, RecommendationSummary};
use async_trait::async_trait;

/// Pass-through repository over `MovieApi`
#[derive(Debug)]
pub struct RemoteMovieRepository {
    api: MovieApi,
}

impl RemoteMovieRepository {
    pub fn new(api: MovieApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MovieRepository for RemoteMovieRepository {
    async fn fetch_popular(&self, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        self.api.popular(page).await
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail> {
        self.api.detail(id).await
    }

    async fn fetch_recommendations(
        &self,
        id: MovieId,
    ) -> Result<PageEnvelope<RecommendationSummary>> {
        self.api.recommendations(id).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        self.api.search(query, page).await
    }
}
