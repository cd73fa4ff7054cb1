//! Songplay fact derivation
//!
//! Plays are joined to song records on
//! `(artist_name, title, duration) == (artist, song, length)` with exact
//! equality, durations included. There is no tolerance: a length that
//! differs from the catalog duration in the last bit does not match.
//!
//! The source query is a left join followed by a null-drop, which behaves
//! exactly like an inner join, so that is what is implemented here.
//! Unmatched plays are dropped silently.

use super::types::{SongplayRow, TimeParts};
use crate::source::{LogEvent, SongRecord};
use crate::types::{SongplayIdStrategy, TimeZoneSetting};
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;

/// Bits of a monotonic id reserved for the row number within a partition
const PARTITION_SHIFT: u32 = 33;

/// Unit separator between hashed fields
const FIELD_SEPARATOR: [u8; 1] = [0x1f];

/// The song columns the join needs
#[derive(Debug, Clone, PartialEq)]
pub struct SongKey {
    pub artist_name: Option<String>,
    pub duration: Option<f64>,
    pub title: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
}

impl From<&SongRecord> for SongKey {
    fn from(record: &SongRecord) -> Self {
        Self {
            artist_name: record.artist_name.clone(),
            duration: record.duration,
            title: record.title.clone(),
            song_id: record.song_id.clone(),
            artist_id: record.artist_id.clone(),
        }
    }
}

/// Project song records down to join keys
pub fn song_keys(records: &[SongRecord]) -> Vec<SongKey> {
    records.iter().map(SongKey::from).collect()
}

/// Hashable form of the join predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JoinKey<'a> {
    artist: &'a str,
    title: &'a str,
    duration_bits: u64,
}

impl<'a> JoinKey<'a> {
    /// Build a key; any null component means the row can never match
    fn new(artist: Option<&'a str>, title: Option<&'a str>, duration: Option<f64>) -> Option<Self> {
        Some(Self {
            artist: artist?,
            title: title?,
            duration_bits: duration_bits(duration?)?,
        })
    }
}

/// Map a float to bits such that bit equality is `==` equality
///
/// `-0.0` folds into `0.0`; NaN equals nothing, so it gets no key.
fn duration_bits(value: f64) -> Option<u64> {
    if value.is_nan() {
        None
    } else if value == 0.0 {
        Some(0.0_f64.to_bits())
    } else {
        Some(value.to_bits())
    }
}

/// Assigns `songplay_id` values during one derivation
#[derive(Debug)]
pub struct SongplayIdGenerator {
    strategy: SongplayIdStrategy,
    next_in_partition: HashMap<usize, i64>,
}

impl SongplayIdGenerator {
    /// Create a generator for one run
    pub fn new(strategy: SongplayIdStrategy) -> Self {
        Self {
            strategy,
            next_in_partition: HashMap::new(),
        }
    }

    /// Produce the id for the next joined row built from `event`
    pub fn next_id(&mut self, event: &LogEvent) -> i64 {
        match self.strategy {
            SongplayIdStrategy::Monotonic => {
                let counter = self.next_in_partition.entry(event.partition).or_insert(0);
                let id = ((event.partition as i64) << PARTITION_SHIFT) + *counter;
                *counter += 1;
                id
            }
            SongplayIdStrategy::ContentHash => content_hash_id(event),
        }
    }
}

/// Stable id from `(userId, ts, sessionId)`; always non-negative
pub fn content_hash_id(event: &LogEvent) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(event.user_id.as_deref().unwrap_or_default().as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(event.ts.map(|ts| ts.to_string()).unwrap_or_default().as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(
        event
            .session_id
            .map(|id| id.to_string())
            .unwrap_or_default()
            .as_bytes(),
    );
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) & (i64::MAX as u64)) as i64
}

/// Derive the `songplays` fact table
///
/// `plays` must already be filtered to play events. A play that matches
/// several song records yields one row per match. Rows missing any
/// projected column are dropped after ids are assigned.
pub fn songplays_table(
    plays: &[LogEvent],
    songs: &[SongKey],
    zone: TimeZoneSetting,
    strategy: SongplayIdStrategy,
) -> Vec<SongplayRow> {
    let mut index: HashMap<JoinKey<'_>, Vec<&SongKey>> = HashMap::new();
    for song in songs {
        if let Some(key) = JoinKey::new(
            song.artist_name.as_deref(),
            song.title.as_deref(),
            song.duration,
        ) {
            index.entry(key).or_default().push(song);
        }
    }

    let mut ids = SongplayIdGenerator::new(strategy);
    let mut rows = Vec::new();

    for event in plays {
        let Some(key) = JoinKey::new(event.artist.as_deref(), event.song.as_deref(), event.length)
        else {
            continue;
        };
        let Some(matches) = index.get(&key) else {
            continue;
        };

        let time = TimeParts::from_event(event, zone);
        for song in matches {
            let songplay_id = ids.next_id(event);
            if let Some(row) = build_row(songplay_id, event, song, time.as_ref()) {
                rows.push(row);
            }
        }
    }

    rows
}

/// Project one joined pair, or `None` if any column is null
fn build_row(
    songplay_id: i64,
    event: &LogEvent,
    song: &SongKey,
    time: Option<&TimeParts>,
) -> Option<SongplayRow> {
    let time = time?;
    Some(SongplayRow {
        songplay_id,
        timestamp: time.timestamp.clone(),
        user_id: event.user_id.clone()?,
        level: event.level.clone()?,
        song_id: song.song_id.clone()?,
        artist_id: song.artist_id.clone()?,
        session_id: event.session_id?,
        user_agent: event.user_agent.clone()?,
        year: time.year,
        month: time.month,
    })
}
