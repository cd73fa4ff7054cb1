//! CLI commands and argument parsing

use crate::types::{SongplayIdStrategy, TimeZoneSetting};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sparkify Lake: song and listening-log JSON to a Parquet star schema
#[derive(Parser, Debug)]
#[command(name = "sparkify-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Input root (local path or cloud URL), overrides the config file
    /// Supports: /path, s3://bucket/path, s3a://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long, global = true)]
    pub input: Option<String>,

    /// Output root (local path or cloud URL), overrides the config file
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Time zone for event timestamps: local, utc or an offset like +02:00
    #[arg(long, global = true)]
    pub time_zone: Option<TimeZoneSetting>,

    /// How songplay ids are generated
    #[arg(long, global = true, value_enum)]
    pub songplay_id: Option<SongplayIdArg>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run both stages and write all five tables
    Run,

    /// Run the song stage only (songs, artists)
    Songs,

    /// Run the log stage only (users, time, songplays)
    Logs,

    /// Validate the configuration and print the resolved settings
    Validate,
}

/// Songplay id strategy as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SongplayIdArg {
    /// Run-local increasing ids (default)
    Monotonic,
    /// Ids hashed from user, timestamp and session
    ContentHash,
}

impl From<SongplayIdArg> for SongplayIdStrategy {
    fn from(arg: SongplayIdArg) -> Self {
        match arg {
            SongplayIdArg::Monotonic => SongplayIdStrategy::Monotonic,
            SongplayIdArg::ContentHash => SongplayIdStrategy::ContentHash,
        }
    }
}
