use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::{MediaItem, MediaKind},
    services::providers::CatalogProvider,
};

/// A candidate that has a content rating
#[derive(Debug, Clone, PartialEq)]
pub struct RatedPick {
    pub item: MediaItem,
    pub rating: String,
    /// Rating lookups made, including the successful one
    pub attempts: usize,
}

/// Picks a uniformly random candidate that has a content rating
///
/// Each unrated pick is removed from `candidates` before the next draw, so
/// the loop makes at most `candidates.len()` lookups. The accepted item is
/// removed too. Fails with `NoRatedCandidates` once the pool is empty; a
/// failed rating lookup aborts the whole selection.
pub async fn sample_rated<R: Rng + Send>(
    provider: &dyn CatalogProvider,
    kind: MediaKind,
    candidates: &mut Vec<MediaItem>,
    rng: &mut R,
) -> AppResult<RatedPick> {
    let pool_size = candidates.len();
    let mut attempts = 0;

    while !candidates.is_empty() {
        let index = rng.gen_range(0..candidates.len());
        let id = candidates[index].id;
        attempts += 1;

        match provider.content_rating(kind, id).await? {
            Some(rating) => {
                let item = candidates.swap_remove(index);
                tracing::debug!(id = id, rating = %rating, attempts = attempts, "Rated candidate accepted");
                return Ok(RatedPick {
                    item,
                    rating,
                    attempts,
                });
            }
            None => {
                tracing::debug!(id = id, remaining = candidates.len() - 1, "Unrated candidate skipped");
                candidates.swap_remove(index);
            }
        }
    }

    tracing::info!(pool_size = pool_size, attempts = attempts, "No rated candidates in pool");
    Err(AppError::NoRatedCandidates)
}
