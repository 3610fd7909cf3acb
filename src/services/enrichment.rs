use crate::{
    error::{AppError, AppResult},
    models::{
        presentation::UNAVAILABLE,
        tmdb::{TmdbCredits, TmdbDetails, TmdbVideos},
        ImageUrls, MediaKind, Presentation, Trailer,
    },
    services::providers::CatalogProvider,
};

/// Poster size on the result panel
pub const DETAIL_POSTER_SIZE: &str = "w500";

const TOP_CAST: usize = 5;
const TRAILER_SITE: &str = "YouTube";
const TRAILER_TYPE: &str = "Trailer";

/// Fetches details, credits and videos concurrently and assembles them
///
/// All three must succeed. Any failure is reported as a single
/// `AppError::Enrichment` and nothing partial is returned.
pub async fn enrich(
    provider: &dyn CatalogProvider,
    kind: MediaKind,
    id: u64,
    content_rating: Option<String>,
    images: &ImageUrls,
) -> AppResult<Presentation> {
    let (details, credits, videos) = tokio::try_join!(
        provider.details(kind, id),
        provider.credits(kind, id),
        provider.videos(kind, id),
    )
    .map_err(|e| {
        tracing::warn!(id = id, kind = %kind, error = %e, "Enrichment fetch failed");
        AppError::Enrichment(Box::new(e))
    })?;

    Ok(assemble(kind, details, &credits, &videos, content_rating, images))
}

/// First crew member credited as director
pub fn director(credits: &TmdbCredits) -> String {
    credits
        .crew
        .iter()
        .find(|person| person.job == "Director")
        .map(|person| person.name.clone())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Top-billed cast names
pub fn top_cast(credits: &TmdbCredits) -> Vec<String> {
    credits
        .cast
        .iter()
        .take(TOP_CAST)
        .map(|actor| actor.name.clone())
        .collect()
}

/// First YouTube trailer
pub fn find_trailer(videos: &TmdbVideos) -> Option<Trailer> {
    videos
        .results
        .iter()
        .find(|video| video.video_type == TRAILER_TYPE && video.site == TRAILER_SITE)
        .map(|video| Trailer::youtube(&video.key))
}

pub fn assemble(
    kind: MediaKind,
    details: TmdbDetails,
    credits: &TmdbCredits,
    videos: &TmdbVideos,
    content_rating: Option<String>,
    images: &ImageUrls,
) -> Presentation {
    let genres = details
        .genres
        .iter()
        .map(|genre| genre.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let runtime_minutes = details
        .runtime
        .filter(|minutes| *minutes > 0)
        .or_else(|| details.episode_run_time.first().copied());

    Presentation {
        id: details.id,
        kind,
        title: details
            .title
            .or(details.name)
            .unwrap_or_else(|| format!("Untitled #{}", details.id)),
        release_date: details
            .release_date
            .or(details.first_air_date)
            .filter(|d| !d.is_empty()),
        runtime_minutes,
        genres,
        content_rating,
        overview: details.overview.unwrap_or_default(),
        director: director(credits),
        cast: top_cast(credits),
        trailer: find_trailer(videos),
        vote_average: details.vote_average,
        poster_url: images.poster(DETAIL_POSTER_SIZE, details.poster_path.as_deref()),
    }
}
