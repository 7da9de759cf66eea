//! Image URL construction
//!
//! The API only returns relative file paths (`/abc123.jpg`). Clients build
//! the full URL from a configured base, a size bucket and that path.

use std::fmt;

/// Public image CDN base
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Size buckets served by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// List thumbnails
    W92,
    /// Recommendation cards
    W154,
    /// Detail poster
    W185,
    W342,
    W500,
    /// Detail backdrop
    W780,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join base, size and file path with exactly one `/` between each part
pub fn image_url(base: &str, size: ImageSize, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{size}/{path}")
}
