// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # cinenook
//!
//! A client for a movie metadata REST API: popular movies page by page,
//! movie details with recommendations, and search.
//!
//! ## Features
//!
//! - **Typed endpoint client**: popular, detail, recommendations and search
//! - **Page-number paging**: sources that map pages to cursors, and a pager
//!   that fills the list ahead of the reader
//! - **View state holders**: one per screen, with explicit create/dispose
//! - **Credentials**: bearer read token or legacy api key
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cinenook::api::MovieApi;
//! use cinenook::config::AppConfig;
//! use cinenook::repository::RemoteMovieRepository;
//! use cinenook::viewmodel::PopularMoviesViewModel;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> cinenook::Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let api = MovieApi::with_config(config.to_http_config())?;
//!     let repository = Arc::new(RemoteMovieRepository::new(api));
//!
//!     let popular = PopularMoviesViewModel::create(repository, 10);
//!     if let Some(snapshot) = popular.settled().await {
//!         for movie in snapshot.items.iter() {
//!             println!("{}", movie.title);
//!         }
//!     }
//!     popular.dispose();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        View models                              │
//! │  Popular (one Pager)   Search (Pager per query)   Detail / Recs │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────────┐
//! │  Pager (task owning the collection)  ◀──  PagingSource          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────────────┴───┬──────────────────────────────┐
//! │Repository│   MovieApi            │   HttpClient                 │
//! │ (trait)  │   4 GET endpoints     │   credentials, timeouts,     │
//! │          │                       │   throttle                   │
//! └──────────┴───────────────────────┴──────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Request credentials
pub mod auth;

/// HTTP client with credentials and rate limiting
pub mod http;

/// Movie records, image URLs and display formatting
pub mod model;

/// Remote endpoint client
pub mod api;

/// Repository abstraction over the endpoint client
pub mod repository;

/// Paging sources and the pager
pub mod paging;

/// Per-screen view state holders
pub mod viewmodel;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use model::{MovieDetail, MovieId, MovieSummary, PageEnvelope};
pub use paging::{LoadState, Pager, PagerConfig, PagerSnapshot};
pub use repository::{MovieRepository, RemoteMovieRepository};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
