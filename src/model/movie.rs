//! Movie records as returned by the API

use super::image::{image_url, ImageSize};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Stable movie identifier
pub type MovieId = u64;

/// One entry of a movie listing (popular, search, recommendations)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// `yyyy-MM-dd`; the API sends an empty string for unknown dates
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
}

impl MovieSummary {
    /// Create a summary with only the required fields set
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            original_title: None,
            original_language: None,
            poster_path: None,
            backdrop_path: None,
            overview: None,
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genre_ids: Vec::new(),
            adult: false,
        }
    }

    /// Parsed release date, if present and well formed
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Full poster URL at the given size
    pub fn poster_url(&self, base: &str, size: ImageSize) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| image_url(base, size, path))
    }

    /// Full backdrop URL at the given size
    pub fn backdrop_url(&self, base: &str, size: ImageSize) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| image_url(base, size, path))
    }
}

/// Recommendations share the listing shape.
pub type RecommendationSummary = MovieSummary;

/// Genre id + name pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Spoken language entry of a movie detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full record for a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetail {
    pub fn id(&self) -> MovieId {
        self.summary.id
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn vote_count(&self) -> u32 {
        self.summary.vote_count
    }

    /// English name of the first spoken language
    pub fn primary_language(&self) -> Option<&str> {
        self.spoken_languages
            .first()
            .and_then(|lang| lang.english_name.as_deref())
    }

    /// Genre names in API order
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }

    /// Tagline, unless missing or blank
    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// One page of a listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> PageEnvelope<T> {
    /// Create an envelope for the given page
    pub fn new(page: u32, results: Vec<T>) -> Self {
        Self {
            page,
            results,
            total_pages: 0,
            total_results: 0,
        }
    }

    /// Check whether the page carried no items
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn first_page() -> u32 {
    1
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
