//! Movie data model
//!
//! Typed records for the movies API responses, plus the small amount of
//! presentation help the screens need: image URLs and display strings.

mod format;
mod image;
mod movie;

pub use format::{format_rating, format_release_date, format_runtime, NOT_AVAILABLE};
pub use image::{image_url, ImageSize, DEFAULT_IMAGE_BASE_URL};
pub use movie::{
    Genre, MovieDetail, MovieId, MovieSummary, PageEnvelope, RecommendationSummary,
    SpokenLanguage,
};
