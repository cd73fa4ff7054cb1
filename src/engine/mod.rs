//! Execution engine module
//!
//! Runs the two pipeline stages: read inputs, derive tables, write outputs.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Pipeline` - owns the run configuration and both storage roots
//! - `SongStageStats` / `LogStageStats` / `RunStats` - what a run wrote
//!
//! The stages share nothing but the raw input: the log stage re-reads the
//! song dataset for its join instead of reusing the song stage's output.

mod types;

pub use types::{LogStageStats, RunStats, SongStageStats};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::TableWriter;
use crate::source::{read_dataset, LogEvent, SongRecord};
use crate::storage::Storage;
use crate::transform;
use std::time::Instant;
use tracing::info;

/// One configured pipeline run
#[derive(Debug)]
pub struct Pipeline {
    /// Run configuration
    config: PipelineConfig,
    /// Raw input root
    source: Storage,
    /// Table writer over the output root
    writer: TableWriter,
}

impl Pipeline {
    /// Validate the config and open both storage roots
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let source = Storage::parse(&config.input, &config.credentials, false)?;
        let destination = Storage::parse(&config.output, &config.credentials, true)?;
        Ok(Self::with_storage(config, source, destination))
    }

    /// Build a pipeline over already-opened storage roots
    pub fn with_storage(config: PipelineConfig, source: Storage, destination: Storage) -> Self {
        let writer = TableWriter::new(destination, config.writer_config());
        Self {
            config,
            source,
            writer,
        }
    }

    /// Get the run configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run both stages, song dataset first
    pub async fn run(&self) -> Result<RunStats> {
        let start = Instant::now();
        info!(
            "Starting run: {} -> {}",
            self.source.root(),
            self.writer.destination().root()
        );

        let song_stage = self.process_song_data().await?;
        let log_stage = self.process_log_data().await?;

        let elapsed = start.elapsed();
        info!("Run finished in {:.2?}", elapsed);
        Ok(RunStats {
            song_stage,
            log_stage,
            elapsed,
        })
    }

    /// Song stage: write `songs` and `artists`
    pub async fn process_song_data(&self) -> Result<SongStageStats> {
        let records = self.read_songs().await?;

        let songs = self
            .writer
            .write_table(&transform::songs_table(&records))
            .await?;
        let artists = self
            .writer
            .write_table(&transform::artists_table(&records))
            .await?;

        Ok(SongStageStats {
            records_read: records.len(),
            songs,
            artists,
        })
    }

    /// Log stage: write `users`, `time` and `songplays`
    pub async fn process_log_data(&self) -> Result<LogStageStats> {
        let glob = self.config.log_glob()?;
        let events: Vec<LogEvent> = read_dataset(&self.source, &glob).await?;
        let events_read = events.len();

        let plays = transform::play_events(events);
        info!("{} of {} log events are song plays", plays.len(), events_read);

        let users = self
            .writer
            .write_table(&transform::users_table(&plays))
            .await?;
        let time = self
            .writer
            .write_table(&transform::time_table(&plays, self.config.time_zone))
            .await?;

        let songs = self.read_songs().await?;
        let songplay_rows = transform::songplays_table(
            &plays,
            &transform::song_keys(&songs),
            self.config.time_zone,
            self.config.songplay_id,
        );
        let songplays = self.writer.write_table(&songplay_rows).await?;

        let stats = LogStageStats {
            events_read,
            play_events: plays.len(),
            songs_read: songs.len(),
            users,
            time,
            songplays,
        };
        info!(
            "Matched {} plays to songs, {} plays dropped",
            stats.songplays.rows,
            stats.unmatched_plays()
        );
        Ok(stats)
    }

    async fn read_songs(&self) -> Result<Vec<SongRecord>> {
        let glob = self.config.song_glob()?;
        read_dataset(&self.source, &glob).await
    }
}
