//! CLI runner - executes commands
//!
//! The runner is the composition root: it turns configuration into a
//! transport, a repository and the view models, then drives them until the
//! requested amount of data is on screen.

use crate::api::MovieApi;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::model::{
    format_rating, format_release_date, format_runtime, ImageSize, MovieDetail, MovieId,
    MovieSummary, NOT_AVAILABLE,
};
use crate::paging::{PagerConfig, PagerSnapshot};
use crate::repository::{MovieRepository, RemoteMovieRepository};
use crate::viewmodel::{
    MovieDetailViewModel, PopularMoviesViewModel, RecommendationsViewModel, Resource,
    SearchMoviesViewModel,
};
use chrono::Datelike;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command against the configured API
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load(self.cli.config.as_deref())?;
        let api = MovieApi::with_config(config.to_http_config())?;
        let repository = Arc::new(RemoteMovieRepository::new(api));

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.execute(&config, repository, &mut out).await
    }

    /// Run the CLI command against `repository`, writing to `out`
    pub async fn execute<R, W>(&self, config: &AppConfig, repository: R, out: &mut W) -> Result<()>
    where
        R: MovieRepository + Clone + 'static,
        W: Write,
    {
        match &self.cli.command {
            Commands::Popular { pages } => {
                let vm = PopularMoviesViewModel::with_config(
                    repository,
                    one_page_per_signal(config.paging.popular_page_size),
                );
                let snapshot = load_popular(&vm, *pages).await;
                vm.dispose();
                self.write_listing(out, config, &snapshot?)
            }
            Commands::Search { query, pages } => {
                let vm = SearchMoviesViewModel::with_config(
                    repository,
                    one_page_per_signal(config.paging.search_page_size),
                );
                vm.on_query_change(query.as_str());
                let snapshot = load_search(&vm, *pages).await;
                vm.dispose();
                self.write_listing(out, config, &snapshot?)
            }
            Commands::Detail { id } => {
                let vm = MovieDetailViewModel::create(repository);
                vm.fetch(*id);
                let detail = ready(vm.settled().await, *id)?;
                self.write_detail(out, config, &detail)
            }
            Commands::Recommendations { id } => {
                let vm = RecommendationsViewModel::create(repository);
                vm.fetch(*id);
                let movies = ready(vm.settled().await, *id)?;
                self.write_movies(out, config, &movies)
            }
        }
    }

    // ========================================================================
    // Output
    // ========================================================================

    fn write_listing<W: Write>(
        &self,
        out: &mut W,
        config: &AppConfig,
        snapshot: &PagerSnapshot<MovieSummary>,
    ) -> Result<()> {
        self.write_movies(out, config, &snapshot.items)?;
        if let Some(err) = snapshot.append.error() {
            warn!(error = %err, "listing incomplete, next page failed");
        }
        Ok(())
    }

    fn write_movies<W: Write>(
        &self,
        out: &mut W,
        config: &AppConfig,
        movies: &[MovieSummary],
    ) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                for movie in movies {
                    writeln!(out, "{}", serde_json::to_string(movie)?)?;
                }
            }
            OutputFormat::Pretty => {
                if movies.is_empty() {
                    writeln!(out, "No movies found")?;
                }
                for (index, movie) in movies.iter().enumerate() {
                    writeln!(out, "{}", listing_line(index, movie))?;
                    if self.cli.verbose {
                        if let Some(url) = movie.poster_url(&config.image_base_url, ImageSize::W185)
                        {
                            writeln!(out, "      {url}")?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn write_detail<W: Write>(
        &self,
        out: &mut W,
        config: &AppConfig,
        detail: &MovieDetail,
    ) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(detail)?)?,
            OutputFormat::Pretty => write!(out, "{}", detail_text(detail, &config.image_base_url))?,
        }
        Ok(())
    }
}

/// Pager tuning for the CLI: each read signal at the end loads exactly one
/// more page
fn one_page_per_signal(page_size: usize) -> PagerConfig {
    PagerConfig::new(page_size).with_prefetch_distance(0)
}

async fn load_popular(
    vm: &PopularMoviesViewModel,
    pages: usize,
) -> Result<PagerSnapshot<MovieSummary>> {
    loop {
        let snapshot = vm
            .settled()
            .await
            .ok_or_else(|| Error::Other("pager closed".to_string()))?;
        if let Some(err) = snapshot.refresh.error() {
            return Err(detach(err));
        }
        if enough(&snapshot, pages) {
            info!(pages = snapshot.pages_loaded, items = snapshot.len(), "popular loaded");
            return Ok(snapshot);
        }
        vm.access(snapshot.len() - 1);
    }
}

async fn load_search<R>(
    vm: &SearchMoviesViewModel<R>,
    pages: usize,
) -> Result<PagerSnapshot<MovieSummary>>
where
    R: MovieRepository + Clone + 'static,
{
    loop {
        let snapshot = vm.settled().await.pager;
        if let Some(err) = snapshot.refresh.error() {
            return Err(detach(err));
        }
        if enough(&snapshot, pages) {
            info!(pages = snapshot.pages_loaded, items = snapshot.len(), "search loaded");
            return Ok(snapshot);
        }
        vm.access(snapshot.len() - 1);
    }
}

/// Stop once `pages` pages are in, the stream ended or an append failed
fn enough(snapshot: &PagerSnapshot<MovieSummary>, pages: usize) -> bool {
    snapshot.is_empty()
        || snapshot.pages_loaded >= pages
        || snapshot.end_of_pagination_reached
        || snapshot.next_key.is_none()
        || snapshot.append.is_error()
}

fn ready<T>(resource: Resource<T>, id: MovieId) -> Result<T> {
    match resource {
        Resource::Ready(value) => Ok(value),
        Resource::Failed(err) => Err(detach(&err)),
        Resource::Idle | Resource::Loading => {
            Err(Error::Other(format!("movie {id}: fetch did not complete")))
        }
    }
}

/// Owned copy of a shared load failure, keeping its kind
fn detach(err: &Error) -> Error {
    match err {
        Error::Config { message } => Error::config(message.clone()),
        Error::MissingConfigField { field } => Error::missing_field(field.clone()),
        Error::InvalidConfigValue { field, message } => {
            Error::invalid_value(field.clone(), message.clone())
        }
        Error::InvalidUrl(e) => Error::InvalidUrl(*e),
        Error::Network { message } => Error::network(message.clone()),
        Error::Timeout { timeout_ms } => Error::Timeout {
            timeout_ms: *timeout_ms,
        },
        Error::HttpStatus { status, body } => Error::http_status(*status, body.clone()),
        Error::NotFound { resource } => Error::not_found(resource.clone()),
        Error::Decode { message } => Error::decode(message.clone()),
        Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), e.to_string())),
        Error::YamlParse(_) | Error::Other(_) => Error::Other(err.to_string()),
    }
}

fn release_year(movie: &MovieSummary) -> String {
    movie
        .release_date()
        .map_or_else(|| "----".to_string(), |date| date.year().to_string())
}

fn listing_line(index: usize, movie: &MovieSummary) -> String {
    format!(
        "{:>4}. {} ({}) {}  [{}]",
        index + 1,
        movie.title,
        release_year(movie),
        format_rating(movie.vote_average),
        movie.id
    )
}

fn detail_text(detail: &MovieDetail, image_base_url: &str) -> String {
    let summary = &detail.summary;
    let mut text = format!("{} [{}]\n", detail.title(), detail.id());
    if let Some(tagline) = detail.tagline() {
        text.push_str(&format!("  \"{tagline}\"\n"));
    }
    text.push_str(&format!(
        "  Released:  {}\n",
        format_release_date(summary.release_date.as_deref())
    ));
    text.push_str(&format!("  Runtime:   {}\n", format_runtime(detail.runtime)));
    text.push_str(&format!(
        "  Rating:    {} ({} votes)\n",
        format_rating(summary.vote_average),
        detail.vote_count()
    ));
    text.push_str(&format!(
        "  Language:  {}\n",
        detail.primary_language().unwrap_or(NOT_AVAILABLE)
    ));
    let genres = detail.genre_names();
    if !genres.is_empty() {
        text.push_str(&format!("  Genres:    {}\n", genres.join(", ")));
    }
    if let Some(url) = summary.poster_url(image_base_url, ImageSize::W500) {
        text.push_str(&format!("  Poster:    {url}\n"));
    }
    if let Some(overview) = summary.overview.as_deref().filter(|o| !o.trim().is_empty()) {
        text.push_str(&format!("\n{overview}\n"));
    }
    text
}
