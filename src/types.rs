//! Common types used throughout Sparkify Lake
//!
//! This module contains shared type definitions, type aliases,
//! and the small configuration enums used across multiple modules.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Songplay Id Strategy
// ============================================================================

/// How the synthetic `songplay_id` key is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongplayIdStrategy {
    /// Run-local increasing counter per input partition.
    /// Unique within a run, not dense, not stable across runs.
    #[default]
    Monotonic,
    /// SHA-256 of `(userId, ts, sessionId)`, stable across runs
    ContentHash,
}

// ============================================================================
// Parquet Compression
// ============================================================================

/// Compression codec for written Parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

// ============================================================================
// Time Zone
// ============================================================================

/// Zone used to render event timestamps into wall-clock fields
///
/// Serialized as `local`, `utc`, or a fixed offset such as `+02:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneSetting {
    /// The zone of the running process
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    /// Render a UTC instant as wall-clock time in this zone
    ///
    /// Returns `None` when the offset pushes the wall clock outside the
    /// representable range.
    pub fn to_wall_clock(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        let naive = instant.naive_utc();
        let offset = match self {
            TimeZoneSetting::Local => Local.offset_from_utc_datetime(&naive).fix(),
            TimeZoneSetting::Utc => return Some(naive),
            TimeZoneSetting::Fixed(offset) => *offset,
        };
        naive.checked_add_offset(offset)
    }
}

impl FromStr for TimeZoneSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" | "z" | "+00:00" => Ok(Self::Utc),
            other => other
                .parse::<FixedOffset>()
                .map(Self::Fixed)
                .map_err(|e| format!("expected 'local', 'utc' or an offset like '+02:00': {e}")),
        }
    }
}

impl TryFrom<String> for TimeZoneSetting {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZoneSetting> for String {
    fn from(zone: TimeZoneSetting) -> Self {
        zone.to_string()
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Utc => write!(f, "utc"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
