//! Plain-text rendering for the terminal.

use serde::Serialize;
use std::fmt::Write;

use crate::{
    error::{AppError, AppResult},
    models::{presentation::UNAVAILABLE, Genre, ImageUrls, MonthListing, Presentation, SearchHit},
};

/// Poster size in the calendar list
pub const CALENDAR_POSTER_SIZE: &str = "w185";

pub fn presentation(p: &Presentation) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", p.title);
    let runtime = p
        .runtime_minutes
        .map(|m| format!("{} mins", m))
        .unwrap_or_else(|| "N/A mins".to_string());
    let _ = writeln!(
        out,
        "{} • {} • {} • Rating: {}",
        p.release_date.as_deref().unwrap_or("Unknown date"),
        runtime,
        p.genres,
        p.content_rating.as_deref().unwrap_or("Not rated")
    );
    if !p.overview.is_empty() {
        let _ = writeln!(out, "\n{}\n", p.overview);
    }
    let _ = writeln!(out, "Director: {}", p.director);
    let cast = if p.cast.is_empty() {
        UNAVAILABLE.to_string()
    } else {
        p.cast.join(", ")
    };
    let _ = writeln!(out, "Cast: {}", cast);
    let _ = writeln!(out, "★ {:.1} / 10", p.vote_average);
    let _ = writeln!(out, "Poster: {}", p.poster_url);
    if let Some(trailer) = &p.trailer {
        let _ = writeln!(out, "Trailer: {}", trailer.url);
    }

    out
}

pub fn month(listing: &MonthListing, images: &ImageUrls) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", listing.window);

    if listing.items.is_empty() {
        let _ = writeln!(out, "No upcoming movies this month.");
        return out;
    }

    for item in &listing.items {
        let _ = writeln!(
            out,
            "  {}  {}",
            item.release_date.as_deref().unwrap_or_default(),
            item.title
        );
        let _ = writeln!(
            out,
            "              {}",
            images.poster(CALENDAR_POSTER_SIZE, item.poster_path.as_deref())
        );
    }

    out
}

pub fn suggestions(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{} ({}) [{}]\n", hit.title, hit.kind, hit.id))
        .collect()
}

pub fn genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|genre| format!("{:>6}  {}\n", genre.id, genre.name))
        .collect()
}

pub fn error(err: &AppError) -> String {
    format!("Error: {}", err.user_message())
}

/// Writes `value` as one JSON line, or the text produced by `text`
pub fn emit<W, T, F>(writer: &mut W, json: bool, value: &T, text: F) -> AppResult<()>
where
    W: std::io::Write,
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        let body = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("failed to encode output: {}", e)))?;
        writer.write_all(body.as_bytes())?;
        writer.write_all(b"\n")?;
    } else {
        writer.write_all(text().as_bytes())?;
    }
    Ok(())
}

/// JSON body for a failed action
pub fn error_json(err: &AppError) -> serde_json::Value {
    serde_json::json!({
        "error": err.user_message(),
        "kind": err.kind(),
    })
}
