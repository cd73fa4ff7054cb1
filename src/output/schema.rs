//! Arrow schemas for the star-schema tables
//!
//! Each output row type knows its table name, its partition columns and
//! how to turn a slice of rows into a RecordBatch.

use crate::error::Result;
use crate::transform::{ArtistRow, SongRow, SongplayRow, TimeParts, UserRow};
use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// An output table of the star schema
pub trait Table: Sized {
    /// Table name; files land under `<NAME>.parquet/`
    const NAME: &'static str;

    /// Hive partition columns, outermost first
    const PARTITION_BY: &'static [&'static str];

    /// Arrow schema of the full table, partition columns included
    fn schema() -> SchemaRef;

    /// Column arrays for `rows`, in schema order
    fn columns(rows: &[Self]) -> Vec<ArrayRef>;

    /// Build a RecordBatch from rows
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(Self::schema(), Self::columns(rows))?)
    }

    /// Directory of the table under the output root
    fn dir() -> String {
        format!("{}.parquet", Self::NAME)
    }
}

fn nullable(name: &str, data_type: DataType) -> Field {
    Field::new(name, data_type, true)
}

fn strings<T>(rows: &[T], f: impl Fn(&T) -> Option<&str>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<StringArray>())
}

fn floats<T>(rows: &[T], f: impl Fn(&T) -> Option<f64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Float64Array>())
}

fn longs<T>(rows: &[T], f: impl Fn(&T) -> Option<i64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int64Array>())
}

fn ints<T>(rows: &[T], f: impl Fn(&T) -> Option<i32>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int32Array>())
}

impl Table for SongRow {
    const NAME: &'static str = "songs";
    const PARTITION_BY: &'static [&'static str] = &["year", "artist_id"];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            nullable("song_id", DataType::Utf8),
            nullable("title", DataType::Utf8),
            nullable("artist_id", DataType::Utf8),
            nullable("year", DataType::Int64),
            nullable("duration", DataType::Float64),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            strings(rows, |r| r.song_id.as_deref()),
            strings(rows, |r| r.title.as_deref()),
            strings(rows, |r| r.artist_id.as_deref()),
            longs(rows, |r| r.year),
            floats(rows, |r| r.duration),
        ]
    }
}

impl Table for ArtistRow {
    const NAME: &'static str = "artists";
    const PARTITION_BY: &'static [&'static str] = &[];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            nullable("artist_id", DataType::Utf8),
            nullable("artist_name", DataType::Utf8),
            nullable("artist_location", DataType::Utf8),
            nullable("artist_latitude", DataType::Float64),
            nullable("artist_longitude", DataType::Float64),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            strings(rows, |r| r.artist_id.as_deref()),
            strings(rows, |r| r.artist_name.as_deref()),
            strings(rows, |r| r.artist_location.as_deref()),
            floats(rows, |r| r.artist_latitude),
            floats(rows, |r| r.artist_longitude),
        ]
    }
}

impl Table for UserRow {
    const NAME: &'static str = "users";
    const PARTITION_BY: &'static [&'static str] = &[];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            nullable("userId", DataType::Utf8),
            nullable("firstName", DataType::Utf8),
            nullable("lastName", DataType::Utf8),
            nullable("gender", DataType::Utf8),
            nullable("level", DataType::Utf8),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            strings(rows, |r| r.user_id.as_deref()),
            strings(rows, |r| r.first_name.as_deref()),
            strings(rows, |r| r.last_name.as_deref()),
            strings(rows, |r| r.gender.as_deref()),
            strings(rows, |r| r.level.as_deref()),
        ]
    }
}

impl Table for TimeParts {
    const NAME: &'static str = "time";
    const PARTITION_BY: &'static [&'static str] = &["year", "month"];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            nullable("timestamp", DataType::Utf8),
            nullable("hour", DataType::Int32),
            nullable("day", DataType::Int32),
            nullable("week", DataType::Int32),
            nullable("month", DataType::Int32),
            nullable("year", DataType::Int32),
            nullable("weekday", DataType::Utf8),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            strings(rows, |r| Some(r.timestamp.as_str())),
            ints(rows, |r| Some(r.hour)),
            ints(rows, |r| Some(r.day)),
            ints(rows, |r| Some(r.week)),
            ints(rows, |r| Some(r.month)),
            ints(rows, |r| Some(r.year)),
            strings(rows, |r| Some(r.weekday.as_str())),
        ]
    }
}

impl Table for SongplayRow {
    const NAME: &'static str = "songplays";
    const PARTITION_BY: &'static [&'static str] = &["year", "month"];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            nullable("songplay_id", DataType::Int64),
            nullable("timestamp", DataType::Utf8),
            nullable("userId", DataType::Utf8),
            nullable("level", DataType::Utf8),
            nullable("song_id", DataType::Utf8),
            nullable("artist_id", DataType::Utf8),
            nullable("sessionId", DataType::Int64),
            nullable("userAgent", DataType::Utf8),
            nullable("year", DataType::Int32),
            nullable("month", DataType::Int32),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            longs(rows, |r| Some(r.songplay_id)),
            strings(rows, |r| Some(r.timestamp.as_str())),
            strings(rows, |r| Some(r.user_id.as_str())),
            strings(rows, |r| Some(r.level.as_str())),
            strings(rows, |r| Some(r.song_id.as_str())),
            strings(rows, |r| Some(r.artist_id.as_str())),
            longs(rows, |r| Some(r.session_id)),
            strings(rows, |r| Some(r.user_agent.as_str())),
            ints(rows, |r| Some(r.year)),
            ints(rows, |r| Some(r.month)),
        ]
    }
}
