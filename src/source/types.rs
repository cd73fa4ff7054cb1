//! Raw input record types
//!
//! Both datasets are read leniently: every field is optional, and a field
//! that is missing or carries an incompatible JSON type becomes `None`
//! instead of failing the record.

use crate::types::{JsonObject, JsonValue};

/// A record that can be built from one decoded JSON document
pub trait JsonRecord: Sized {
    /// Build the record from a JSON value read from input partition `partition`
    fn from_json(value: &JsonValue, partition: usize) -> Self;
}

/// One song metadata record from the song dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongRecord {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: Option<f64>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

impl JsonRecord for SongRecord {
    fn from_json(value: &JsonValue, _partition: usize) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            song_id: string_field(obj, "song_id"),
            title: string_field(obj, "title"),
            artist_id: string_field(obj, "artist_id"),
            year: int_field(obj, "year"),
            duration: float_field(obj, "duration"),
            artist_name: string_field(obj, "artist_name"),
            artist_location: string_field(obj, "artist_location"),
            artist_latitude: float_field(obj, "artist_latitude"),
            artist_longitude: float_field(obj, "artist_longitude"),
        }
    }
}

/// One user-activity event from the log dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEvent {
    pub page: Option<String>,
    /// Epoch milliseconds
    pub ts: Option<i64>,
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub artist: Option<String>,
    pub song: Option<String>,
    /// Track length in seconds
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub user_agent: Option<String>,
    /// Index of the input file this event was read from
    pub partition: usize,
}

impl JsonRecord for LogEvent {
    fn from_json(value: &JsonValue, partition: usize) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                partition,
                ..Self::default()
            };
        };

        Self {
            page: string_field(obj, "page"),
            ts: int_field(obj, "ts"),
            user_id: string_field(obj, "userId"),
            first_name: string_field(obj, "firstName"),
            last_name: string_field(obj, "lastName"),
            gender: string_field(obj, "gender"),
            level: string_field(obj, "level"),
            artist: string_field(obj, "artist"),
            song: string_field(obj, "song"),
            length: float_field(obj, "length"),
            session_id: int_field(obj, "sessionId"),
            user_agent: string_field(obj, "userAgent"),
            partition,
        }
    }
}

/// Read a string field; non-string scalars are rendered as JSON text
fn string_field(obj: &JsonObject, key: &str) -> Option<String> {
    match obj.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read an integer field; integral floats are accepted
fn int_field(obj: &JsonObject, key: &str) -> Option<i64> {
    let value = obj.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15)
            .map(|f| f as i64)
    })
}

/// Read a float field; integers are widened
fn float_field(obj: &JsonObject, key: &str) -> Option<f64> {
    obj.get(key)?.as_f64()
}
