//! Engine types
//!
//! Per-stage and per-run statistics.

use crate::output::TableStats;
use serde::Serialize;
use std::time::Duration;

/// Result of the song dataset stage
#[derive(Debug, Clone, Serialize)]
pub struct SongStageStats {
    /// Song records read
    pub records_read: usize,
    /// `songs` table write
    pub songs: TableStats,
    /// `artists` table write
    pub artists: TableStats,
}

/// Result of the log dataset stage
#[derive(Debug, Clone, Serialize)]
pub struct LogStageStats {
    /// Log events read
    pub events_read: usize,
    /// Events with `page == "NextSong"`
    pub play_events: usize,
    /// Song records re-read for the join
    pub songs_read: usize,
    /// `users` table write
    pub users: TableStats,
    /// `time` table write
    pub time: TableStats,
    /// `songplays` table write
    pub songplays: TableStats,
}

impl LogStageStats {
    /// Plays dropped because they matched no song or had a null column
    pub fn unmatched_plays(&self) -> usize {
        self.play_events.saturating_sub(self.songplays.rows)
    }
}

/// Result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Song stage result
    pub song_stage: SongStageStats,
    /// Log stage result
    pub log_stage: LogStageStats,
    /// Wall-clock duration of the run
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl RunStats {
    /// All five table writes, in write order
    pub fn tables(&self) -> Vec<&TableStats> {
        vec![
            &self.song_stage.songs,
            &self.song_stage.artists,
            &self.log_stage.users,
            &self.log_stage.time,
            &self.log_stage.songplays,
        ]
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
