//! Play-event filtering and the `users` dimension

use super::types::UserRow;
use crate::source::LogEvent;

/// Page value marking an actual song play
pub const PLAY_PAGE: &str = "NextSong";

/// Whether an event is a song play
pub fn is_play(event: &LogEvent) -> bool {
    event.page.as_deref() == Some(PLAY_PAGE)
}

/// Keep only song-play events, in input order
pub fn play_events(events: Vec<LogEvent>) -> Vec<LogEvent> {
    events.into_iter().filter(is_play).collect()
}

/// Project the `users` dimension, one row per play event
///
/// Users are not deduplicated and no "latest level" is resolved: a user
/// with N plays gets N rows, each carrying that event's level.
pub fn users_table(plays: &[LogEvent]) -> Vec<UserRow> {
    plays
        .iter()
        .map(|event| UserRow {
            user_id: event.user_id.clone(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
            level: event.level.clone(),
        })
        .collect()
}
