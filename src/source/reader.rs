//! JSON-lines dataset reader

use super::types::JsonRecord;
use crate::error::{Error, Result};
use crate::storage::{Glob, Storage};
use crate::types::JsonValue;
use tracing::{debug, info, warn};

/// Read every file matching `glob` under `storage` and decode its records
///
/// Files are read in sorted key order; the index of a file in that order
/// is its partition number. Matching nothing is an error.
pub async fn read_dataset<T: JsonRecord>(storage: &Storage, glob: &Glob) -> Result<Vec<T>> {
    let keys = storage.glob(glob).await?;
    if keys.is_empty() {
        return Err(Error::NoInput {
            pattern: storage.display_key(glob.pattern()),
        });
    }

    let mut records = Vec::new();
    for (partition, key) in keys.iter().enumerate() {
        let data = storage.read(key).await?;
        let before = records.len();
        records.extend(decode_json_lines::<T>(&data, partition, key));
        debug!("Read {} records from {}", records.len() - before, key);
    }

    info!(
        "Read {} records from {} files matching {}",
        records.len(),
        keys.len(),
        storage.display_key(glob.pattern())
    );
    Ok(records)
}

/// Decode one JSON document per non-empty line
///
/// A line that is not valid JSON still yields a record, with every field
/// null, so record counts always match line counts.
pub fn decode_json_lines<T: JsonRecord>(data: &[u8], partition: usize, key: &str) -> Vec<T> {
    let body = String::from_utf8_lossy(data);
    let mut records = Vec::new();

    for (line_num, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value = match serde_json::from_str::<JsonValue>(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Malformed JSON in {} at line {}: {e}", key, line_num + 1);
                JsonValue::Null
            }
        };
        records.push(T::from_json(&value, partition));
    }

    records
}
