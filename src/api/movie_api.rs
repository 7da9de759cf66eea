//! Movie endpoint client

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::model::{MovieDetail, MovieId, MovieSummary, PageEnvelope, RecommendationSummary};
use tracing::debug;

/// Public API base (version 3)
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Client for the movie endpoints
#[derive(Debug)]
pub struct MovieApi {
    http: HttpClient,
}

impl MovieApi {
    /// Wrap an already configured HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build the HTTP client from config; falls back to the public base URL
    pub fn with_config(mut config: HttpClientConfig) -> Result<Self> {
        if config.base_url.is_none() {
            config.base_url = Some(DEFAULT_API_BASE_URL.to_string());
        }
        Ok(Self::new(HttpClient::with_config(config)?))
    }

    /// Underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// One page of the popular listing
    pub async fn popular(&self, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        check_page(page)?;
        debug!(page, "fetching popular movies");
        self.http
            .get_json(
                "movie/popular",
                RequestConfig::new().query("page", page.to_string()),
            )
            .await
    }

    /// Full record for one movie; a 404 becomes `Error::NotFound`
    pub async fn detail(&self, id: MovieId) -> Result<MovieDetail> {
        debug!(id, "fetching movie detail");
        self.http
            .get_json(&format!("movie/{id}"), RequestConfig::new())
            .await
            .map_err(|e| match e {
                Error::HttpStatus { status: 404, .. } => Error::not_found(format!("movie {id}")),
                other => other,
            })
    }

    /// Recommendations for one movie, single batch
    pub async fn recommendations(
        &self,
        id: MovieId,
    ) -> Result<PageEnvelope<RecommendationSummary>> {
        debug!(id, "fetching recommendations");
        self.http
            .get_json(&format!("movie/{id}/recommendations"), RequestConfig::new())
            .await
    }

    /// One page of free-text search results
    pub async fn search(&self, query: &str, page: u32) -> Result<PageEnvelope<MovieSummary>> {
        check_page(page)?;
        debug!(query, page, "searching movies");
        self.http
            .get_json(
                "search/movie",
                RequestConfig::new()
                    .query("query", query)
                    .query("page", page.to_string()),
            )
            .await
    }
}

/// Pages are 1-based
fn check_page(page: u32) -> Result<()> {
    if page == 0 {
        return Err(Error::invalid_value("page", "pages start at 1"));
    }
    Ok(())
}
