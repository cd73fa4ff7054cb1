//! Output row types for the star schema

use serde::Serialize;

/// Row of the `songs` dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRow {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: Option<f64>,
}

/// Row of the `artists` dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRow {
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

/// Row of the `users` dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Row of the `time` dimension: one decomposed event instant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TimeParts {
    /// Wall-clock time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub hour: i32,
    pub day: i32,
    /// ISO-8601 week number
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// Abbreviated day name (`Mon`..`Sun`)
    pub weekday: String,
}

/// Row of the `songplays` fact table
///
/// Every column is required: rows with a missing value never get built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub timestamp: String,
    pub user_id: String,
    pub level: String,
    pub song_id: String,
    pub artist_id: String,
    pub session_id: i64,
    pub user_agent: String,
    pub year: i32,
    pub month: i32,
}
