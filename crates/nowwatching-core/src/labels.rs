//! Display strings built from provider and catalog fields.

use nowwatching_api::tmdb::types::CatalogDetails;
use nowwatching_api::trakt::types::{Episode, Movie, Show};

/// Separator between descriptor segments.
pub const SEPARATOR: &str = " • ";

const TRAKT_WEB: &str = "https://trakt.tv";

/// `S01E05 - Pilot`, or `S01E05` when the episode has no title.
pub fn episode_label(season: u32, number: u32, title: &str) -> String {
    let label = format!("S{season:02}E{number:02}");
    if title.is_empty() {
        label
    } else {
        format!("{label} - {title}")
    }
}

pub fn episode_label_for(episode: &Episode) -> String {
    episode_label(
        episode.season.unwrap_or(0),
        episode.number.unwrap_or(0),
        episode.title.as_deref().unwrap_or_default(),
    )
}

/// Up to two genre names joined by `", "`.
pub fn genre_list(details: &CatalogDetails) -> String {
    details.genre_names(2).join(", ")
}

/// `2h 28m`, or `45m` under an hour.
pub fn runtime_label(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// `Severance (2022) • Drama, Mystery`. Missing segments are dropped.
pub fn show_descriptor(title: &str, year: Option<u32>, genres: &str) -> String {
    let mut out = match year {
        Some(year) => format!("{title} ({year})"),
        None => title.to_string(),
    };
    if !genres.is_empty() {
        out.push_str(SEPARATOR);
        out.push_str(genres);
    }
    out
}

/// `2010 • Science Fiction, Action • 2h 28m`, starting from `Movie` when the
/// year is unknown.
pub fn movie_descriptor(year: Option<u32>, genres: &str, runtime_minutes: Option<u32>) -> String {
    let mut out = match year {
        Some(year) => year.to_string(),
        None => "Movie".to_string(),
    };
    if !genres.is_empty() {
        out.push_str(SEPARATOR);
        out.push_str(genres);
    }
    if let Some(minutes) = runtime_minutes.filter(|m| *m > 0) {
        out.push_str(SEPARATOR);
        out.push_str(&runtime_label(minutes));
    }
    out
}

/// Short history info line for a movie: its year, or `Movie`.
pub fn movie_year_label(movie: &Movie) -> String {
    movie
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Movie".to_string())
}

pub fn movie_page_url(movie: &Movie) -> Option<String> {
    movie
        .ids
        .slug
        .as_deref()
        .map(|slug| format!("{TRAKT_WEB}/movies/{slug}"))
}

pub fn episode_page_url(show: &Show, episode: &Episode) -> Option<String> {
    let slug = show.ids.slug.as_deref()?;
    match (episode.season, episode.number) {
        (Some(season), Some(number)) => Some(format!(
            "{TRAKT_WEB}/shows/{slug}/seasons/{season}/episodes/{number}"
        )),
        _ => Some(format!("{TRAKT_WEB}/shows/{slug}")),
    }
}
