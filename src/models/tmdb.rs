//! Wire types for the TMDB v3 API.
//!
//! Only the fields this crate reads are declared; everything else in the
//! payloads is ignored.

use serde::Deserialize;

use super::{MediaItem, MediaKind, SearchHit};

/// Country whose certification is used as the content rating
pub const RATING_COUNTRY: &str = "US";

/// One entry of a `results` list from discover or search endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    /// Only present on multi-search results
    #[serde(default)]
    pub media_type: Option<String>,
}

impl TmdbListItem {
    /// Converts to a `MediaItem`, treating empty date strings as absent
    pub fn into_media_item(self, kind: MediaKind) -> MediaItem {
        let title = self
            .title
            .or(self.name)
            .unwrap_or_else(|| format!("Untitled #{}", self.id));
        let release_date = self
            .release_date
            .or(self.first_air_date)
            .filter(|d| !d.trim().is_empty());

        MediaItem {
            id: self.id,
            title,
            release_date,
            kind,
            poster_path: self.poster_path,
            popularity: self.popularity.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
        }
    }

    /// Converts a multi-search result, skipping people and unknown kinds
    pub fn into_search_hit(self) -> Option<SearchHit> {
        let kind = match self.media_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            Some("tv") => MediaKind::Series,
            _ => return None,
        };
        let item = self.into_media_item(kind);
        Some(SearchHit {
            id: item.id,
            title: item.title,
            kind,
        })
    }
}

/// `GET /movie/{id}/release_dates`
#[derive(Debug, Deserialize)]
pub struct ReleaseDatesResponse {
    pub results: Vec<CountryReleaseDates>,
}

#[derive(Debug, Deserialize)]
pub struct CountryReleaseDates {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ReleaseDateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseDateEntry {
    #[serde(default)]
    pub certification: String,
}

impl ReleaseDatesResponse {
    pub fn certification(&self) -> Option<String> {
        self.results
            .iter()
            .find(|r| r.iso_3166_1 == RATING_COUNTRY)
            .and_then(|r| r.release_dates.first())
            .map(|d| d.certification.trim().to_string())
            .filter(|c| !c.is_empty())
    }
}

/// `GET /tv/{id}/content_ratings`
#[derive(Debug, Deserialize)]
pub struct ContentRatingsResponse {
    pub results: Vec<CountryContentRating>,
}

#[derive(Debug, Deserialize)]
pub struct CountryContentRating {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: String,
}

impl ContentRatingsResponse {
    pub fn rating(&self) -> Option<String> {
        self.results
            .iter()
            .find(|r| r.iso_3166_1 == RATING_COUNTRY)
            .map(|r| r.rating.trim().to_string())
            .filter(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

/// `GET /{movie|tv}/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// `GET /{movie|tv}/{id}/credits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

/// `GET /{movie|tv}/{id}/videos`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideos {
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_movie_deserialization() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "popularity": 83.9,
            "vote_average": 8.4,
            "vote_count": 35000,
            "genre_ids": [28, 878]
        }"#;

        let raw: TmdbListItem = serde_json::from_str(json).unwrap();
        let item = raw.into_media_item(MediaKind::Movie);
        assert_eq!(item.id, 27205);
        assert_eq!(item.title, "Inception");
        assert_eq!(item.release_date.as_deref(), Some("2010-07-15"));
        assert_eq!(item.vote_count, 35000);
    }

    #[test]
    fn test_list_item_series_uses_name_and_air_date() {
        let json = r#"{"id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17"}"#;
        let item = serde_json::from_str::<TmdbListItem>(json)
            .unwrap()
            .into_media_item(MediaKind::Series);
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.release_date.as_deref(), Some("2011-04-17"));
        assert_eq!(item.kind, MediaKind::Series);
    }

    #[test]
    fn test_empty_release_date_is_absent() {
        let json = r#"{"id": 5, "title": "TBA", "release_date": ""}"#;
        let item = serde_json::from_str::<TmdbListItem>(json)
            .unwrap()
            .into_media_item(MediaKind::Movie);
        assert_eq!(item.release_date, None);
    }

    #[test]
    fn test_search_hit_skips_people() {
        let person: TmdbListItem =
            serde_json::from_str(r#"{"id": 1, "name": "Someone", "media_type": "person"}"#).unwrap();
        assert!(person.into_search_hit().is_none());

        let show: TmdbListItem =
            serde_json::from_str(r#"{"id": 2, "name": "Dark", "media_type": "tv"}"#).unwrap();
        let hit = show.into_search_hit().unwrap();
        assert_eq!(hit.kind, MediaKind::Series);
        assert_eq!(hit.title, "Dark");
    }

    #[test]
    fn test_movie_certification_uses_us_entry() {
        let json = r#"{"id": 1, "results": [
            {"iso_3166_1": "DE", "release_dates": [{"certification": "12"}]},
            {"iso_3166_1": "US", "release_dates": [{"certification": "PG-13"}, {"certification": ""}]}
        ]}"#;
        let response: ReleaseDatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.certification(), Some("PG-13".to_string()));
    }

    #[test]
    fn test_movie_certification_empty_is_absent() {
        let json = r#"{"results": [{"iso_3166_1": "US", "release_dates": [{"certification": ""}]}]}"#;
        let response: ReleaseDatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.certification(), None);

        let response: ReleaseDatesResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(response.certification(), None);
    }

    #[test]
    fn test_tv_content_rating() {
        let json = r#"{"results": [{"iso_3166_1": "US", "rating": "TV-MA"}]}"#;
        let response: ContentRatingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.rating(), Some("TV-MA".to_string()));
    }

    #[test]
    fn test_video_deserialization() {
        let json = r#"{"results": [{"key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer", "name": "Official"}]}"#;
        let videos: TmdbVideos = serde_json::from_str(json).unwrap();
        assert_eq!(videos.results[0].video_type, "Trailer");
    }

    #[test]
    fn test_missing_results_field_is_rejected() {
        assert!(serde_json::from_str::<ReleaseDatesResponse>(r#"{"id": 1}"#).is_err());
        assert!(serde_json::from_str::<ContentRatingsResponse>(r#"{"id": 1}"#).is_err());
        assert!(serde_json::from_str::<TmdbVideos>(r#"{"id": 1}"#).is_err());
    }
}
