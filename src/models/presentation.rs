use serde::Serialize;

use super::MediaKind;

/// Placeholder text for missing director/cast
pub const UNAVAILABLE: &str = "Not available";

/// A YouTube trailer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trailer {
    pub key: String,
    pub url: String,
}

impl Trailer {
    pub fn youtube(key: &str) -> Self {
        Self {
            key: key.to_string(),
            url: format!("https://www.youtube.com/embed/{}", key),
        }
    }
}

/// Everything the result panel shows for one title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Presentation {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    /// Genre names joined with ", "
    pub genres: String,
    pub content_rating: Option<String>,
    pub overview: String,
    pub director: String,
    /// Up to five cast names, billing order
    pub cast: Vec<String>,
    pub trailer: Option<Trailer>,
    pub vote_average: f64,
    pub poster_url: String,
}

/// Shown when a title has no poster
pub const PLACEHOLDER_POSTER: &str = "https://placehold.co/400x600";

/// Builds image CDN URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// `<base>/<size><path>`, or the placeholder when there is no path
    pub fn poster(&self, size: &str, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}{}", self.base.trim_end_matches('/'), size, path),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p")
    }
}
