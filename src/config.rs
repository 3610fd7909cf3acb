use serde::Deserialize;
use std::path::PathBuf;

/// Which key/value store backs the release calendar cache
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    File,
    Redis,
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_cache_backend")]
    pub cache_backend: CacheBackend,

    /// Directory for the file cache; falls back to the platform cache dir
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Redis connection URL, only used with the redis backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Static genre list (media kind -> genres)
    #[serde(default = "default_genres_path")]
    pub genres_path: PathBuf,

    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: i64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_cache_backend() -> CacheBackend {
    CacheBackend::File
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_genres_path() -> PathBuf {
    PathBuf::from("data/genres.json")
}

fn default_cache_ttl_hours() -> i64 {
    24
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Directory used by the file-backed cache
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("cinepick")
        })
    }
}
