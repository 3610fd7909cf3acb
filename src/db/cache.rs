use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

use crate::{db::KeyValueStore, models::MediaItem};

/// Default lifetime of a cached month
pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ReleaseMonth { year: i32, month: u32 },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::ReleaseMonth { year, month } => write!(f, "movies_{}_{:02}", year, month),
        }
    }
}

/// Stored form of one cached month
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: Vec<MediaItem>,
    /// Write time in Unix milliseconds
    timestamp: i64,
}

/// Month-keyed cache of release listings with lazy expiry
///
/// An entry is readable while it is younger than the TTL and is otherwise
/// treated as absent. Nothing is ever deleted; a stale entry is overwritten
/// by the next successful fetch for its month.
#[derive(Clone)]
pub struct ReleaseCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ReleaseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(store, Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Cached items for the month, if present and fresh
    pub async fn get(&self, year: i32, month: u32) -> Option<Vec<MediaItem>> {
        self.get_at(year, month, Utc::now()).await
    }

    /// Same as `get`, evaluated at `now`
    ///
    /// Store failures and unreadable entries count as a miss.
    pub async fn get_at(&self, year: i32, month: u32, now: DateTime<Utc>) -> Option<Vec<MediaItem>> {
        let key = CacheKey::ReleaseMonth { year, month };

        let raw = match self.store.get(&key.to_string()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, store = self.store.name(), error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt cache entry, treating as miss");
                return None;
            }
        };

        let Some(age) = now.timestamp_millis().checked_sub(entry.timestamp) else {
            tracing::warn!(key = %key, timestamp = entry.timestamp, "Cache entry timestamp out of range, treating as miss");
            return None;
        };
        if age >= self.ttl.num_milliseconds() {
            tracing::debug!(key = %key, age_ms = age, "Cache entry expired");
            return None;
        }

        tracing::debug!(key = %key, items = entry.data.len(), "Cache hit");
        Some(entry.data)
    }

    /// Overwrites the month's entry with `items`, stamped now
    pub async fn put(&self, year: i32, month: u32, items: &[MediaItem]) {
        self.put_at(year, month, items, Utc::now()).await
    }

    /// Same as `put`, stamped with `now`
    ///
    /// Failures are logged; a write that does not land just means the next
    /// read misses.
    pub async fn put_at(&self, year: i32, month: u32, items: &[MediaItem], now: DateTime<Utc>) {
        let key = CacheKey::ReleaseMonth { year, month };
        let entry = CacheEntry {
            data: items.to_vec(),
            timestamp: now.timestamp_millis(),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = self.store.set(&key.to_string(), json).await {
            tracing::warn!(key = %key, store = self.store.name(), error = %e, "Cache write failed");
        }
    }
}
