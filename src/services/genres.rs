use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, MediaKind},
};

#[derive(Debug, Deserialize)]
struct GenreFile {
    genres: HashMap<String, Vec<Genre>>,
}

/// Genres for one media kind from the static genre file
///
/// The file is keyed by catalog path segment (`movie`, `tv`). A kind with no
/// entry yields an empty list.
pub async fn load_genres(path: &Path, kind: MediaKind) -> AppResult<Vec<Genre>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::GenreConfig(format!("failed to read {}: {}", path.display(), e))
    })?;
    parse_genres(&content, kind)
}

pub fn parse_genres(content: &str, kind: MediaKind) -> AppResult<Vec<Genre>> {
    let mut file: GenreFile = serde_json::from_str(content)
        .map_err(|e| AppError::GenreConfig(format!("invalid genre file: {}", e)))?;

    Ok(file
        .genres
        .remove(kind.path_segment())
        .unwrap_or_default())
}
