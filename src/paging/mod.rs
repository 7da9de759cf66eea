//! Paging module
//!
//! Page-number pagination over the repository:
//!
//! - `PagingSource` loads one page for a key and reports the next key
//! - `PopularMoviesSource` / `SearchMoviesSource` are the two listings
//! - `Pager` keeps the merged collection filled ahead of the reader and
//!   publishes snapshots of it
//!
//! # Overview
//!
//! ```text
//!  consumer ── access(i) ──▶ Pager task ── load(key) ──▶ PagingSource ──▶ MovieRepository
//!     ▲                          │
//!     └──── PagerSnapshot ◀──────┘  (items, refresh state, append state)
//! ```

mod pager;
mod source;
mod types;

pub use pager::Pager;
pub use source::{PagingSource, PopularMoviesSource, SearchMoviesSource};
pub use types::{
    LoadParams, LoadResult, LoadState, LoadType, Page, PageInfo, PageKey, PagerConfig,
    PagerSnapshot, PagingState, FIRST_PAGE,
};

#[cfg(test)]
mod tests;
