/// Remote catalog abstraction
///
/// Everything the pipelines need from the movie database goes through
/// `CatalogProvider`, so the discovery and calendar logic can run against a
/// fake in tests and the real TMDB client in the binary.
use crate::{
    error::AppResult,
    models::{
        tmdb::{TmdbCredits, TmdbDetails, TmdbVideos},
        DiscoveryFilter, MediaItem, MediaKind, MonthWindow, SearchHit,
    },
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Trait for remote catalog providers
///
/// All calls are single GET requests; none are retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Titles matching a genre/kind/advanced-filter selection
    async fn discover(&self, filter: &DiscoveryFilter) -> AppResult<Vec<MediaItem>>;

    /// Movies the catalog says release inside the window
    ///
    /// The catalog's own date filter is not trusted; callers re-validate.
    async fn discover_release_window(&self, window: &MonthWindow) -> AppResult<Vec<MediaItem>>;

    /// Free-text search over movies and series, people already removed
    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>>;

    /// Age classification for a title, `None` when the catalog has none
    async fn content_rating(&self, kind: MediaKind, id: u64) -> AppResult<Option<String>>;

    async fn details(&self, kind: MediaKind, id: u64) -> AppResult<TmdbDetails>;

    async fn credits(&self, kind: MediaKind, id: u64) -> AppResult<TmdbCredits>;

    async fn videos(&self, kind: MediaKind, id: u64) -> AppResult<TmdbVideos>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
