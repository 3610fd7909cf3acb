use rand::{rngs::StdRng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    db::ReleaseCache,
    error::{AppError, AppResult},
    models::{
        DiscoveryFilter, ImageUrls, MediaKind, MonthListing, MonthWindow, Navigation,
        Presentation, SearchHit, SeenSet,
    },
    services::{calendar, discovery, search, CatalogProvider, Discovery},
};

/// Sets a flag for its lifetime and clears it on drop, whatever the exit path
struct ActivityGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ActivityGuard<'a> {
    /// Claims the flag, or returns `None` if it is already set
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Outcome of a calendar navigation request
#[derive(Debug)]
pub enum NavigationOutcome {
    Loaded(MonthListing),
    /// Another navigation was in flight; nothing happened
    Dropped,
}

/// Session state for both pipelines
///
/// One controller lives for the whole session. It owns the seen set, the
/// calendar position and the activity flags that the old page kept in
/// module-level variables.
pub struct Controller {
    provider: Arc<dyn CatalogProvider>,
    cache: ReleaseCache,
    images: ImageUrls,
    seen: Mutex<SeenSet>,
    calendar_position: Mutex<MonthWindow>,
    calendar_loading: AtomicBool,
    discovering: AtomicBool,
}

impl Controller {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        cache: ReleaseCache,
        images: ImageUrls,
        start: MonthWindow,
    ) -> Self {
        Self {
            provider,
            cache,
            images,
            seen: Mutex::new(SeenSet::new()),
            calendar_position: Mutex::new(start),
            calendar_loading: AtomicBool::new(false),
            discovering: AtomicBool::new(false),
        }
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    /// Runs the discovery pipeline
    ///
    /// Fails with `AppError::Busy` while another discovery is running.
    pub async fn discover(&self, filter: &DiscoveryFilter) -> AppResult<Discovery> {
        let Some(_busy) = ActivityGuard::try_acquire(&self.discovering) else {
            tracing::debug!("Discovery rejected while another is running");
            return Err(AppError::Busy);
        };
        let mut rng = StdRng::from_entropy();

        tracing::info!(
            genre = %filter.genre,
            kind = %filter.kind,
            year = ?filter.year,
            min_rating = ?filter.min_rating,
            min_popularity = ?filter.min_popularity,
            "Discover requested"
        );

        discovery::discover(
            self.provider.as_ref(),
            filter,
            &self.seen,
            &mut rng,
            &self.images,
        )
        .await
    }

    /// Moves the calendar and loads the new month
    ///
    /// Returns `Dropped` without moving, fetching or rendering when a previous
    /// navigation is still loading.
    pub async fn navigate(&self, navigation: Navigation) -> AppResult<NavigationOutcome> {
        let Some(loading) = ActivityGuard::try_acquire(&self.calendar_loading) else {
            tracing::debug!(navigation = ?navigation, "Navigation dropped while loading");
            return Ok(NavigationOutcome::Dropped);
        };

        let window = self.move_position(|position| position.step(navigation))?;
        self.load_month(window, loading).await
    }

    /// Jumps the calendar to a specific month and loads it
    ///
    /// Goes through the same guard as `navigate`.
    pub async fn jump_to(&self, window: MonthWindow) -> AppResult<NavigationOutcome> {
        let Some(loading) = ActivityGuard::try_acquire(&self.calendar_loading) else {
            tracing::debug!(window = %window, "Jump dropped while loading");
            return Ok(NavigationOutcome::Dropped);
        };

        self.move_position(|_| Ok(window))?;
        self.load_month(window, loading).await
    }

    fn move_position<F>(&self, next: F) -> AppResult<MonthWindow>
    where
        F: FnOnce(&MonthWindow) -> AppResult<MonthWindow>,
    {
        let mut position = self
            .calendar_position
            .lock()
            .map_err(|e| AppError::Internal(format!("calendar position poisoned: {}", e)))?;
        let window = next(&position)?;
        *position = window;
        Ok(window)
    }

    /// Loads `window` while `_loading` holds the calendar flag
    async fn load_month(
        &self,
        window: MonthWindow,
        _loading: ActivityGuard<'_>,
    ) -> AppResult<NavigationOutcome> {
        let listing = calendar::load_month(self.provider.as_ref(), &self.cache, window).await?;
        tracing::info!(
            window = %listing.window,
            items = listing.items.len(),
            from_cache = listing.from_cache,
            "Calendar month loaded"
        );
        Ok(NavigationOutcome::Loaded(listing))
    }

    pub async fn search(&self, query: &str) -> AppResult<Presentation> {
        search::search_title(self.provider.as_ref(), query, &self.images).await
    }

    pub async fn show(&self, kind: MediaKind, id: u64) -> AppResult<Presentation> {
        search::show_title(self.provider.as_ref(), kind, id, &self.images).await
    }

    pub async fn suggestions(&self, query: &str) -> Vec<SearchHit> {
        search::suggestions(self.provider.as_ref(), query).await
    }

    pub fn is_calendar_loading(&self) -> bool {
        self.calendar_loading.load(Ordering::Acquire)
    }

    pub fn is_discovering(&self) -> bool {
        self.discovering.load(Ordering::Acquire)
    }

    pub fn calendar_position(&self) -> Option<MonthWindow> {
        self.calendar_position.lock().ok().map(|position| *position)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }
}
