//! View state holders
//!
//! Each holder owns the loading machinery for one screen and republishes
//! its state through a `watch` channel. Holders are created explicitly and
//! torn down with `dispose()` (or by dropping them), which abandons any
//! in-flight fetch.
//!
//! | Holder                      | State                              |
//! |-----------------------------|------------------------------------|
//! | `PopularMoviesViewModel`    | one `Pager` for its whole lifetime |
//! | `SearchMoviesViewModel`     | a new `Pager` per query            |
//! | `MovieDetailViewModel`      | `Resource<MovieDetail>`            |
//! | `RecommendationsViewModel`  | `Resource<Vec<RecommendationSummary>>` |

mod popular;
mod resource;
mod search;

pub use popular::PopularMoviesViewModel;
pub use resource::{MovieDetailViewModel, RecommendationsViewModel, Resource};
pub use search::{SearchMoviesViewModel, SearchSnapshot};
