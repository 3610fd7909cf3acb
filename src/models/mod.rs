use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Display, str::FromStr};

pub mod filter;
pub mod month_window;
pub mod presentation;
pub mod tmdb;

pub use filter::{DiscoveryFilter, GenreSelection};
pub use month_window::{MonthWindow, Navigation};
pub use presentation::{ImageUrls, Presentation, Trailer};

/// Kind of media in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    #[serde(rename = "tv", alias = "series")]
    Series,
}

impl MediaKind {
    /// Path segment used by the catalog for this kind
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "series" | "show" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind '{}': expected movie or tv", other)),
        }
    }
}

/// A movie or series as returned by the catalog's list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: u64,
    pub title: String,
    /// Raw release (or first air) date; may be absent or malformed
    pub release_date: Option<String>,
    pub kind: MediaKind,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

impl MediaItem {
    /// Parses the release date as a `YYYY-MM-DD` calendar date
    pub fn parsed_release_date(&self) -> Option<NaiveDate> {
        let raw = self.release_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Identifiers already shown during this session
///
/// Only grows. An id in here is never offered again by the sampler.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    ids: HashSet<u64>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an id, returning false if it was already present
    pub fn insert(&mut self, id: u64) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drops every item that has already been shown
    pub fn retain_unseen(&self, items: Vec<MediaItem>) -> Vec<MediaItem> {
        items
            .into_iter()
            .filter(|item| !self.contains(item.id))
            .collect()
    }
}

/// A `{id, name}` genre record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    /// Either a numeric catalog id or a composite selector such as `16-ja`
    #[serde(deserialize_with = "filter::deserialize_genre_id")]
    pub id: String,
    pub name: String,
}

/// One free-text search hit that is a movie or series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    pub kind: MediaKind,
}

/// A month of releases, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct MonthListing {
    pub window: MonthWindow,
    pub items: Vec<MediaItem>,
    pub from_cache: bool,
}
