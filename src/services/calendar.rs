use crate::{
    cached_month,
    db::ReleaseCache,
    error::{AppError, AppResult},
    models::{MediaItem, MonthListing, MonthWindow},
    services::providers::CatalogProvider,
};

/// Keeps items released inside the window, sorted by release date
///
/// The catalog's own date-range filter is not trusted: items without a
/// parseable date are logged and dropped, and the rest must fall inside the
/// window's range and its exact year and month.
pub fn filter_release_window(items: Vec<MediaItem>, window: &MonthWindow) -> Vec<MediaItem> {
    let mut dated: Vec<_> = items
        .into_iter()
        .filter_map(|item| {
            let Some(date) = item.parsed_release_date() else {
                match &item.release_date {
                    None => tracing::warn!(id = item.id, title = %item.title, "Skipping item with no release date"),
                    Some(raw) => tracing::warn!(
                        id = item.id,
                        title = %item.title,
                        release_date = %raw,
                        "Skipping item with invalid release date"
                    ),
                }
                return None;
            };

            if window.contains(date) {
                Some((date, item))
            } else {
                tracing::debug!(id = item.id, date = %date, window = %window, "Dropping item outside window");
                None
            }
        })
        .collect();

    dated.sort_by_key(|(date, _)| *date);
    dated.into_iter().map(|(_, item)| item).collect()
}

/// Releases for one month, from the cache when fresh, otherwise from the
/// catalog (filtered, sorted, then cached)
///
/// Cache hits go through the same date filter as fresh results.
pub async fn load_month(
    provider: &dyn CatalogProvider,
    cache: &ReleaseCache,
    window: MonthWindow,
) -> AppResult<MonthListing> {
    let (items, from_cache) = cached_month!(cache, window.year, window.month, async move {
        let raw = provider.discover_release_window(&window).await?;
        let fetched = raw.len();
        let items = filter_release_window(raw, &window);

        tracing::info!(
            window = %window,
            fetched = fetched,
            kept = items.len(),
            provider = provider.name(),
            "Release window filtered"
        );

        Ok::<_, AppError>(items)
    })?;

    let items = if from_cache {
        filter_release_window(items, &window)
    } else {
        items
    };

    Ok(MonthListing {
        window,
        items,
        from_cache,
    })
}
