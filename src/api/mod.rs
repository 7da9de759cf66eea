//! Remote endpoint client
//!
//! Typed access to the four read-only movie endpoints:
//!
//! | Operation         | Request                                  |
//! |-------------------|------------------------------------------|
//! | popular           | `GET movie/popular?page=N`               |
//! | detail            | `GET movie/{id}`                         |
//! | recommendations   | `GET movie/{id}/recommendations`         |
//! | search            | `GET search/movie?query=Q&page=N`        |

mod movie_api;

pub use movie_api::{MovieApi, DEFAULT_API_BASE_URL};
