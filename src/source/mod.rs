//! Source module
//!
//! Reads the raw song and log datasets from the input root.
//!
//! # Overview
//!
//! - `SongRecord` / `LogEvent` - leniently decoded input records
//! - `read_dataset` - list files by glob and decode every JSON line
//! - `decode_json_lines` - decode one file's contents

mod reader;
mod types;

pub use reader::{decode_json_lines, read_dataset};
pub use types::{JsonRecord, LogEvent, SongRecord};
