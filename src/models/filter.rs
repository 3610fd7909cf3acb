use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

use super::MediaKind;

/// Genre id used for animation in the catalog
const ANIMATION_GENRE_ID: u32 = 16;

/// Keyword ids that mark a title as anime
const ANIME_KEYWORDS: &str = "210024|287501";

/// A genre choice from the genre list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenreSelection {
    /// A plain catalog genre id
    Genre(u32),
    /// Animation restricted to Japanese-language anime (`16-ja`)
    JapaneseAnimation,
}

impl FromStr for GenreSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "16-ja" {
            return Ok(GenreSelection::JapaneseAnimation);
        }
        s.parse::<u32>()
            .map(GenreSelection::Genre)
            .map_err(|_| format!("invalid genre '{}'", s))
    }
}

impl Display for GenreSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenreSelection::Genre(id) => write!(f, "{}", id),
            GenreSelection::JapaneseAnimation => write!(f, "16-ja"),
        }
    }
}

/// Criteria for one discovery action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryFilter {
    pub genre: GenreSelection,
    pub kind: MediaKind,
    pub year: Option<i32>,
    /// Minimum average vote (0-10)
    pub min_rating: Option<f64>,
    /// Minimum vote count, the catalog's stand-in for popularity
    pub min_popularity: Option<u32>,
}

impl DiscoveryFilter {
    pub fn new(genre: GenreSelection, kind: MediaKind) -> Self {
        Self {
            genre,
            kind,
            year: None,
            min_rating: None,
            min_popularity: None,
        }
    }

    /// Query parameters for the catalog's discover endpoint
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("include_adult", "false".to_string())];

        match self.genre {
            GenreSelection::Genre(id) => params.push(("with_genres", id.to_string())),
            GenreSelection::JapaneseAnimation => {
                params.push(("with_genres", ANIMATION_GENRE_ID.to_string()));
                params.push(("with_original_language", "ja".to_string()));
                params.push(("with_keywords", ANIME_KEYWORDS.to_string()));
            }
        }

        if let Some(year) = self.year {
            let key = match self.kind {
                MediaKind::Movie => "primary_release_year",
                MediaKind::Series => "first_air_date_year",
            };
            params.push((key, year.to_string()));
        }
        if let Some(rating) = self.min_rating {
            params.push(("vote_average.gte", rating.to_string()));
        }
        if let Some(votes) = self.min_popularity {
            params.push(("vote_count.gte", votes.to_string()));
        }

        params
    }
}

/// Accepts genre ids written either as JSON numbers or strings
pub(crate) fn deserialize_genre_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
