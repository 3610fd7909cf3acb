/// A macro to simplify read-through caching of a month's releases.
///
/// This macro checks if a fresh entry for the month is present in the cache.
/// If found, it returns the cached items together with `true`.
/// If not found, it executes the provided block to compute the items,
/// writes them to the cache, and returns them together with `false`.
///
/// # Arguments
/// * `$cache`: A `ReleaseCache` (anything with async `get`/`put` taking year and month).
/// * `$year`, `$month`: The month to cache under.
/// * `$block`: A future yielding `AppResult<Vec<MediaItem>>`, run only on a miss.
///
/// # Example
/// ```rust,ignore
/// let (items, from_cache) = cached_month!(cache, 2024, 2, async move {
///     fetch_and_filter(window).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached_month {
    ($cache:expr, $year:expr, $month:expr, $block:expr) => {{
        // Attempt to get the value from cache
        if let Some(cached) = $cache.get($year, $month).await {
            Ok((cached, true))
        } else {
            // If not in cache, execute the block to compute the value
            match $block.await {
                Ok(value) => {
                    // Store the computed value in cache
                    $cache.put($year, $month, &value).await;
                    Ok((value, false))
                }
                Err(e) => Err(e),
            }
        }
    }};
}
