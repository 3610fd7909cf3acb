use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;
use tokio_test::{assert_err, assert_ok};

use cinepick::{
    db::{KeyValueStore, MemoryStore, ReleaseCache},
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbCredits, TmdbDetails, TmdbVideos},
        DiscoveryFilter, GenreSelection, ImageUrls, MediaItem, MediaKind, MonthWindow, Navigation,
        SearchHit,
    },
    services::CatalogProvider,
    session::run_session,
    Controller, NavigationOutcome,
};

/// In-process catalog with call counters
#[derive(Default)]
struct FakeCatalog {
    discover_items: Vec<MediaItem>,
    rated: HashSet<u64>,
    release_items: Vec<MediaItem>,
    release_calls: AtomicUsize,
    rating_calls: AtomicUsize,
    /// When set, release window fetches wait for a notification
    gate: Option<Arc<Notify>>,
    /// When set, discover queries wait for a notification
    discover_gate: Option<Arc<Notify>>,
    discover_calls: AtomicUsize,
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn discover(&self, _filter: &DiscoveryFilter) -> AppResult<Vec<MediaItem>> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.discover_gate {
            gate.notified().await;
        }
        Ok(self.discover_items.clone())
    }

    async fn discover_release_window(&self, _window: &MonthWindow) -> AppResult<Vec<MediaItem>> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.release_items.clone())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>> {
        Ok(vec![SearchHit {
            id: 42,
            title: query.to_string(),
            kind: MediaKind::Movie,
        }])
    }

    async fn content_rating(&self, _kind: MediaKind, id: u64) -> AppResult<Option<String>> {
        self.rating_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rated.contains(&id).then(|| "PG-13".to_string()))
    }

    async fn details(&self, _kind: MediaKind, id: u64) -> AppResult<TmdbDetails> {
        let details = serde_json::from_value(json!({
            "id": id,
            "title": format!("Title {}", id),
            "release_date": "2024-03-01",
            "runtime": 100,
            "genres": [{"id": 28, "name": "Action"}],
            "vote_average": 7.0,
        }))
        .map_err(|e| AppError::MalformedResponse(e.to_string()))?;
        Ok(details)
    }

    async fn credits(&self, _kind: MediaKind, _id: u64) -> AppResult<TmdbCredits> {
        Ok(TmdbCredits::default())
    }

    async fn videos(&self, _kind: MediaKind, _id: u64) -> AppResult<TmdbVideos> {
        Ok(TmdbVideos::default())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn movie(id: u64, release_date: &str) -> MediaItem {
    MediaItem {
        id,
        title: format!("Title {}", id),
        release_date: Some(release_date.to_string()),
        kind: MediaKind::Movie,
        poster_path: None,
        popularity: 10.0,
        vote_average: 7.0,
        vote_count: 100,
    }
}

fn controller_with(catalog: Arc<FakeCatalog>, store: Arc<dyn KeyValueStore>, start: MonthWindow) -> Controller {
    Controller::new(catalog, ReleaseCache::new(store), ImageUrls::default(), start)
}

fn action_filter() -> DiscoveryFilter {
    DiscoveryFilter::new(GenreSelection::Genre(28), MediaKind::Movie)
}

#[tokio::test]
async fn test_discovery_never_repeats_within_session() {
    let catalog = Arc::new(FakeCatalog {
        discover_items: (1..=5).map(|id| movie(id, "2024-03-01")).collect(),
        rated: (1..=5).collect(),
        ..Default::default()
    });
    let controller = controller_with(
        catalog.clone(),
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 3).unwrap(),
    );

    let mut shown = HashSet::new();
    for k in 1..=5 {
        let found = controller.discover(&action_filter()).await.unwrap();
        assert!(shown.insert(found.presentation.id), "id offered twice");
        assert_eq!(controller.seen_count(), k);
    }

    let err = controller.discover(&action_filter()).await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "No new results found. Try adjusting the filters or media type."
    );
    assert_eq!(controller.seen_count(), 5);
    assert!(!controller.is_discovering());
}

#[tokio::test]
async fn test_discovery_skips_unrated_candidates() {
    let catalog = Arc::new(FakeCatalog {
        discover_items: (1..=4).map(|id| movie(id, "2024-03-01")).collect(),
        rated: HashSet::from([3]),
        ..Default::default()
    });
    let controller = controller_with(
        catalog.clone(),
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 3).unwrap(),
    );

    let found = controller.discover(&action_filter()).await.unwrap();
    assert_eq!(found.presentation.id, 3);
    assert_eq!(found.presentation.content_rating.as_deref(), Some("PG-13"));

    // Remaining pool has no rated titles: every one is tried exactly once
    let before = catalog.rating_calls.load(Ordering::SeqCst);
    let err = assert_err!(controller.discover(&action_filter()).await);
    assert!(matches!(err, AppError::NoRatedCandidates));
    assert_eq!(catalog.rating_calls.load(Ordering::SeqCst) - before, 3);
    assert_eq!(controller.seen_count(), 1);
}

#[tokio::test]
async fn test_overlapping_discovery_is_rejected() {
    let gate = Arc::new(Notify::new());
    let catalog = Arc::new(FakeCatalog {
        discover_items: (1..=3).map(|id| movie(id, "2024-03-01")).collect(),
        rated: (1..=3).collect(),
        discover_gate: Some(gate.clone()),
        ..Default::default()
    });
    let controller = controller_with(
        catalog.clone(),
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 3).unwrap(),
    );

    let filter = action_filter();
    let (first, second) = tokio::join!(controller.discover(&filter), async {
        let outcome = controller.discover(&filter).await;
        gate.notify_one();
        outcome
    });

    assert_ok!(first);
    assert!(matches!(second, Err(AppError::Busy)));
    assert_eq!(catalog.discover_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.seen_count(), 1);
    assert!(!controller.is_discovering());

    // Once the first finishes the next one runs
    gate.notify_one();
    assert_ok!(controller.discover(&filter).await);
    assert_eq!(controller.seen_count(), 2);
}

#[tokio::test]
async fn test_overlapping_navigation_is_dropped() {
    let gate = Arc::new(Notify::new());
    let catalog = Arc::new(FakeCatalog {
        release_items: vec![movie(1, "2024-04-10")],
        gate: Some(gate.clone()),
        ..Default::default()
    });
    let controller = controller_with(
        catalog.clone(),
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 3).unwrap(),
    );

    let (first, second) = tokio::join!(controller.navigate(Navigation::Next), async {
        let outcome = controller.navigate(Navigation::Next).await;
        gate.notify_one();
        outcome
    });

    match first.unwrap() {
        NavigationOutcome::Loaded(listing) => {
            assert_eq!((listing.window.year, listing.window.month), (2024, 4));
            assert_eq!(listing.items.len(), 1);
        }
        NavigationOutcome::Dropped => panic!("first navigation should load"),
    }
    assert!(matches!(second.unwrap(), NavigationOutcome::Dropped));
    assert_eq!(catalog.release_calls.load(Ordering::SeqCst), 1);

    let position = controller.calendar_position().unwrap();
    assert_eq!((position.year, position.month), (2024, 4));
    assert!(!controller.is_calendar_loading());
}

#[tokio::test]
async fn test_cached_month_skips_catalog() {
    let catalog = Arc::new(FakeCatalog {
        release_items: vec![
            movie(1, "2024-02-20"),
            movie(2, "2024-02-03"),
            movie(3, "2024-03-01"),
        ],
        ..Default::default()
    });
    let controller = controller_with(
        catalog.clone(),
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 2).unwrap(),
    );

    let NavigationOutcome::Loaded(first) = controller.navigate(Navigation::Current).await.unwrap() else {
        panic!("navigation should load");
    };
    assert!(!first.from_cache);
    let ids: Vec<u64> = first.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![2, 1]);

    let NavigationOutcome::Loaded(second) = controller.navigate(Navigation::Current).await.unwrap() else {
        panic!("navigation should load");
    };
    assert!(second.from_cache);
    assert_eq!(second.items, first.items);
    assert_eq!(catalog.release_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_expired_month_is_refetched() {
    let catalog = Arc::new(FakeCatalog {
        release_items: vec![movie(1, "2024-02-20")],
        ..Default::default()
    });
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let controller = Controller::new(
        catalog.clone(),
        ReleaseCache::with_ttl(store, chrono::Duration::zero()),
        ImageUrls::default(),
        MonthWindow::new(2024, 2).unwrap(),
    );

    assert_ok!(controller.navigate(Navigation::Current).await);
    assert_ok!(controller.navigate(Navigation::Current).await);
    assert_eq!(catalog.release_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_session_keeps_state_between_commands() {
    let catalog = Arc::new(FakeCatalog {
        discover_items: (1..=3).map(|id| movie(id, "2024-03-01")).collect(),
        rated: (1..=3).collect(),
        release_items: vec![],
        ..Default::default()
    });
    let controller = controller_with(
        catalog.clone(),
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 12).unwrap(),
    );

    let input = "discover 28\ndiscover 28\nseen\nnext\ndance\nsearch   \nquit\ndiscover 28\n";
    let mut output = Vec::new();
    run_session(
        &controller,
        tokio::io::BufReader::new(input.as_bytes()),
        &mut output,
        false,
    )
    .await
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("2 titles shown this session"));
    assert!(text.contains("January 2025\nNo upcoming movies this month."));
    assert!(text.contains("unknown command 'dance'"));
    assert!(text.contains("Error: Please enter a search term"));
    // Nothing after quit runs
    assert_eq!(controller.seen_count(), 2);
}

#[tokio::test]
async fn test_session_json_errors() {
    let catalog = Arc::new(FakeCatalog::default());
    let controller = controller_with(
        catalog,
        Arc::new(MemoryStore::new()),
        MonthWindow::new(2024, 1).unwrap(),
    );

    let mut output = Vec::new();
    run_session(
        &controller,
        tokio::io::BufReader::new("discover 28\n".as_bytes()),
        &mut output,
        true,
    )
    .await
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    let last = text.lines().last().unwrap();
    let value: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(value["kind"], "no_candidates");
    assert_eq!(value["error"], "No results found. Try adjusting the filters.");
}
