//! Song dataset projections: `songs` and `artists`
//!
//! Both are straight column projections. Nothing is filtered or
//! deduplicated, so a catalog listing the same artist on several songs
//! yields one artist row per song.

use super::types::{ArtistRow, SongRow};
use crate::source::SongRecord;

/// Project the `songs` dimension, one row per song record
pub fn songs_table(records: &[SongRecord]) -> Vec<SongRow> {
    records
        .iter()
        .map(|record| SongRow {
            song_id: record.song_id.clone(),
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        })
        .collect()
}

/// Project the `artists` dimension, one row per song record
pub fn artists_table(records: &[SongRecord]) -> Vec<ArtistRow> {
    records
        .iter()
        .map(|record| ArtistRow {
            artist_id: record.artist_id.clone(),
            artist_name: record.artist_name.clone(),
            artist_location: record.artist_location.clone(),
            artist_latitude: record.artist_latitude,
            artist_longitude: record.artist_longitude,
        })
        .collect()
}
