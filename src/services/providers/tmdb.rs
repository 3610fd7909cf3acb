/// TMDB v3 catalog provider
///
/// Authenticates with the `api_key` query parameter. Every list endpoint
/// answers with a `{"results": [...]}` envelope; a response without that field
/// is rejected as malformed rather than read as an empty list.
///
/// Endpoints used:
/// - Discover: /discover/{movie|tv}
/// - Release calendar: /discover/movie with a release-date range
/// - Search: /search/multi
/// - Rating: /movie/{id}/release_dates, /tv/{id}/content_ratings
/// - Enrichment: /{kind}/{id}, /{kind}/{id}/credits, /{kind}/{id}/videos
use crate::{
    error::{AppError, AppResult},
    models::{
        tmdb::{
            ContentRatingsResponse, ReleaseDatesResponse, TmdbCredits, TmdbDetails, TmdbListItem,
            TmdbVideos,
        },
        DiscoveryFilter, MediaItem, MediaKind, MonthWindow, SearchHit,
    },
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Original language for the release calendar
const CALENDAR_LANGUAGE: &str = "en";

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    /// Creates a client whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("cinepick/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a path and return the decoded JSON body
    ///
    /// Non-success statuses become `AppError::RemoteFetch`.
    async fn get_value(&self, path: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let url = self.url(path);
        tracing::debug!(url = %url, params = ?params, "Fetching from catalog");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                body = %body,
                "Catalog returned non-success status"
            );
            return Err(AppError::remote_fetch(status));
        }

        Ok(response.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let value = self.get_value(path, params).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to deserialize catalog response");
            AppError::MalformedResponse(format!("{}: {}", path, e))
        })
    }

    /// GET a list endpoint and return its `results` entries
    async fn get_results(&self, path: &str, params: &[(&str, String)]) -> AppResult<Vec<TmdbListItem>> {
        let value = self.get_value(path, params).await?;
        parse_results(path, &value)
    }
}

/// Extracts the `results` list, skipping entries that do not deserialize
fn parse_results(path: &str, value: &Value) -> AppResult<Vec<TmdbListItem>> {
    let results_array = value["results"].as_array().ok_or_else(|| {
        AppError::MalformedResponse(format!("{} response has no `results` list", path))
    })?;

    Ok(results_array
        .iter()
        .filter_map(|result| match serde_json::from_value::<TmdbListItem>(result.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable result entry");
                None
            }
        })
        .collect())
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn discover(&self, filter: &DiscoveryFilter) -> AppResult<Vec<MediaItem>> {
        let path = format!("discover/{}", filter.kind.path_segment());
        let items: Vec<MediaItem> = self
            .get_results(&path, &filter.query_params())
            .await?
            .into_iter()
            .map(|raw| raw.into_media_item(filter.kind))
            .collect();

        tracing::info!(
            genre = %filter.genre,
            kind = %filter.kind,
            results = items.len(),
            provider = "tmdb",
            "Discover completed"
        );

        Ok(items)
    }

    async fn discover_release_window(&self, window: &MonthWindow) -> AppResult<Vec<MediaItem>> {
        let params = [
            ("release_date.gte", window.start_param()),
            ("release_date.lte", window.end_param()),
            ("include_adult", "false".to_string()),
            ("with_original_language", CALENDAR_LANGUAGE.to_string()),
        ];
        let items: Vec<MediaItem> = self
            .get_results("discover/movie", &params)
            .await?
            .into_iter()
            .map(|raw| raw.into_media_item(MediaKind::Movie))
            .collect();

        tracing::info!(
            window = %window,
            results = items.len(),
            provider = "tmdb",
            "Release window fetched"
        );

        Ok(items)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>> {
        let params = [
            ("query", query.to_string()),
            ("include_adult", "false".to_string()),
        ];
        let hits: Vec<SearchHit> = self
            .get_results("search/multi", &params)
            .await?
            .into_iter()
            .filter_map(TmdbListItem::into_search_hit)
            .collect();

        tracing::info!(
            query = %query,
            results = hits.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(hits)
    }

    async fn content_rating(&self, kind: MediaKind, id: u64) -> AppResult<Option<String>> {
        let rating = match kind {
            MediaKind::Movie => self
                .get_json::<ReleaseDatesResponse>(&format!("movie/{}/release_dates", id), &[])
                .await?
                .certification(),
            MediaKind::Series => self
                .get_json::<ContentRatingsResponse>(&format!("tv/{}/content_ratings", id), &[])
                .await?
                .rating(),
        };

        tracing::debug!(id = id, kind = %kind, rating = ?rating, "Content rating fetched");
        Ok(rating)
    }

    async fn details(&self, kind: MediaKind, id: u64) -> AppResult<TmdbDetails> {
        self.get_json(&format!("{}/{}", kind.path_segment(), id), &[])
            .await
    }

    async fn credits(&self, kind: MediaKind, id: u64) -> AppResult<TmdbCredits> {
        self.get_json(&format!("{}/{}/credits", kind.path_segment(), id), &[])
            .await
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> AppResult<TmdbVideos> {
        self.get_json(&format!("{}/{}/videos", kind.path_segment(), id), &[])
            .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
