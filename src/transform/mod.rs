//! Transform module
//!
//! Pure, synchronous derivations of the five star-schema tables.
//!
//! # Overview
//!
//! - `songs_table` / `artists_table` - song dataset projections
//! - `play_events` / `users_table` - play filter and user projection
//! - `time_table` - timestamp decomposition with null-drop
//! - `songplays_table` - exact-match join of plays to songs
//!
//! Nothing here touches storage; the engine reads inputs and writes
//! outputs around these functions.

mod log;
mod song;
mod songplays;
mod time;
mod types;

pub use log::{is_play, play_events, users_table, PLAY_PAGE};
pub use song::{artists_table, songs_table};
pub use songplays::{content_hash_id, song_keys, songplays_table, SongKey, SongplayIdGenerator};
pub use time::time_table;
pub use types::{ArtistRow, SongRow, SongplayRow, TimeParts, UserRow};
