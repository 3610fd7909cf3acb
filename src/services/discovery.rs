use rand::Rng;
use std::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoveryFilter, ImageUrls, Presentation, SeenSet},
    services::{enrichment, providers::CatalogProvider, sampler},
};

/// Result of one discovery action
#[derive(Debug, Clone)]
pub struct Discovery {
    pub presentation: Presentation,
    /// Rating lookups the sampler needed
    pub attempts: usize,
}

fn lock_seen(seen: &Mutex<SeenSet>) -> AppResult<std::sync::MutexGuard<'_, SeenSet>> {
    seen.lock()
        .map_err(|e| AppError::Internal(format!("seen set poisoned: {}", e)))
}

/// Finds a random rated title that has not been shown this session
///
/// 1. Query the catalog with the filter
/// 2. Drop everything already in `seen`
/// 3. Sample until a candidate with a content rating turns up
/// 4. Record the pick in `seen`, before any further I/O
/// 5. Fetch details, credits and videos
///
/// Because of step 4 a pick is never offered again even if enrichment fails.
pub async fn discover<R: Rng + Send>(
    provider: &dyn CatalogProvider,
    filter: &DiscoveryFilter,
    seen: &Mutex<SeenSet>,
    rng: &mut R,
    images: &ImageUrls,
) -> AppResult<Discovery> {
    let results = provider.discover(filter).await?;
    if results.is_empty() {
        return Err(AppError::NoCandidates(
            "No results found. Try adjusting the filters.".to_string(),
        ));
    }

    let total = results.len();
    let mut candidates = {
        let seen = lock_seen(seen)?;
        seen.retain_unseen(results)
    };
    if candidates.is_empty() {
        return Err(AppError::NoCandidates(
            "No new results found. Try adjusting the filters or media type.".to_string(),
        ));
    }

    tracing::debug!(
        total = total,
        unseen = candidates.len(),
        "Sampling discovery candidates"
    );

    let pick = sampler::sample_rated(provider, filter.kind, &mut candidates, rng).await?;

    {
        let mut seen = lock_seen(seen)?;
        seen.insert(pick.item.id);
    }

    tracing::info!(
        id = pick.item.id,
        title = %pick.item.title,
        rating = %pick.rating,
        attempts = pick.attempts,
        "Discovered title"
    );

    let presentation =
        enrichment::enrich(provider, filter.kind, pick.item.id, Some(pick.rating), images).await?;

    Ok(Discovery {
        presentation,
        attempts: pick.attempts,
    })
}
