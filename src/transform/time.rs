//! Timestamp decomposition and the `time` dimension
//!
//! The epoch value is converted once into a single wall-clock instant and
//! every field is read off that instant, so `hour` can never disagree with
//! `day` or `weekday` for the same event.

use super::types::TimeParts;
use crate::source::LogEvent;
use crate::types::TimeZoneSetting;
use chrono::{DateTime, Datelike, Timelike};

impl TimeParts {
    /// Decompose epoch milliseconds in the given zone
    ///
    /// Sub-second precision is truncated toward negative infinity.
    /// Returns `None` when the instant, or its wall-clock rendering in
    /// `zone`, is outside the representable range.
    pub fn from_epoch_millis(ts: i64, zone: TimeZoneSetting) -> Option<Self> {
        let instant = DateTime::from_timestamp(ts.div_euclid(1000), 0)?;
        let wall = zone.to_wall_clock(instant)?;

        Some(Self {
            timestamp: wall.format("%Y-%m-%d %H:%M:%S").to_string(),
            hour: wall.hour() as i32,
            day: wall.day() as i32,
            week: wall.iso_week().week() as i32,
            month: wall.month() as i32,
            year: wall.year(),
            weekday: wall.format("%a").to_string(),
        })
    }

    /// Decompose an event's `ts`, if it has one
    pub fn from_event(event: &LogEvent, zone: TimeZoneSetting) -> Option<Self> {
        event.ts.and_then(|ts| Self::from_epoch_millis(ts, zone))
    }
}

/// Derive the `time` dimension, one row per play event
///
/// Events whose time fields cannot be derived are dropped.
pub fn time_table(plays: &[LogEvent], zone: TimeZoneSetting) -> Vec<TimeParts> {
    plays
        .iter()
        .filter_map(|event| TimeParts::from_event(event, zone))
        .collect()
}
