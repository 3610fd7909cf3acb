use crate::{
    error::{AppError, AppResult},
    models::{ImageUrls, MediaKind, Presentation, SearchHit},
    services::{enrichment, providers::CatalogProvider},
};

/// Shorter queries produce no suggestions
pub const MIN_SUGGESTION_CHARS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

/// Searches by text and presents the best movie or series hit
pub async fn search_title(
    provider: &dyn CatalogProvider,
    query: &str,
    images: &ImageUrls,
) -> AppResult<Presentation> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Please enter a search term".to_string(),
        ));
    }

    let hits = provider.search(query).await?;
    let first = hits.into_iter().next().ok_or_else(|| {
        AppError::NoCandidates("No results found. Try a different search term.".to_string())
    })?;

    show_title(provider, first.kind, first.id, images).await
}

/// Presents a specific title, e.g. a chosen suggestion
///
/// Unlike discovery, a missing content rating is fine here.
pub async fn show_title(
    provider: &dyn CatalogProvider,
    kind: MediaKind,
    id: u64,
    images: &ImageUrls,
) -> AppResult<Presentation> {
    let rating = provider.content_rating(kind, id).await?;
    enrichment::enrich(provider, kind, id, rating, images).await
}

/// Live suggestions for a partial query
///
/// Never fails: lookup errors are logged and give an empty list.
pub async fn suggestions(provider: &dyn CatalogProvider, query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGESTION_CHARS {
        return Vec::new();
    }

    match provider.search(query).await {
        Ok(hits) => hits.into_iter().take(MAX_SUGGESTIONS).collect(),
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Suggestion lookup failed");
            Vec::new()
        }
    }
}
