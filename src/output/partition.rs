//! Hive-style partitioning
//!
//! Splits a RecordBatch by the values of its partition columns. Partition
//! columns move into the directory path (`year=2018/month=11/`) and are
//! removed from the file body, the layout Spark and Hive readers expect.

use crate::error::{Error, Result};
use arrow::array::{Array, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use std::collections::BTreeMap;

/// Directory name used for a null partition value
pub const DEFAULT_PARTITION_NAME: &str = "__HIVE_DEFAULT_PARTITION__";

/// One output partition: its directory and the rows that belong there
#[derive(Debug, Clone)]
pub struct Partition {
    /// Relative directory such as `year=2018/month=11`; empty if unpartitioned
    pub dir: String,
    /// Rows of the partition, without the partition columns
    pub batch: RecordBatch,
}

/// Split `batch` into partitions by `columns`, in sorted directory order
///
/// With no partition columns the whole batch is one partition with an
/// empty directory, even when it has no rows.
pub fn partition_batch(batch: &RecordBatch, columns: &[&str]) -> Result<Vec<Partition>> {
    if columns.is_empty() {
        return Ok(vec![Partition {
            dir: String::new(),
            batch: batch.clone(),
        }]);
    }

    let schema = batch.schema();
    let mut partition_indices = Vec::with_capacity(columns.len());
    for name in columns {
        let index = schema
            .index_of(name)
            .map_err(|_| Error::output(format!("Partition column '{name}' not in schema")))?;
        partition_indices.push(index);
    }

    let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let mut segments = Vec::with_capacity(columns.len());
        for (name, &index) in columns.iter().zip(&partition_indices) {
            let array = batch.column(index);
            let value = if array.is_null(row) {
                DEFAULT_PARTITION_NAME.to_string()
            } else {
                escape_path_name(&array_value_to_string(array, row)?)
            };
            segments.push(format!("{name}={value}"));
        }
        groups.entry(segments.join("/")).or_default().push(row as u32);
    }

    let keep: Vec<usize> = (0..schema.fields().len())
        .filter(|i| !partition_indices.contains(i))
        .collect();

    let mut partitions = Vec::with_capacity(groups.len());
    for (dir, rows) in groups {
        let taken = take_record_batch(batch, &UInt32Array::from(rows))?;
        partitions.push(Partition {
            dir,
            batch: taken.project(&keep)?,
        });
    }
    Ok(partitions)
}

/// Percent-escape characters that are unsafe in a partition directory name
pub fn escape_path_name(value: &str) -> String {
    if value.is_empty() {
        return DEFAULT_PARTITION_NAME.to_string();
    }

    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if needs_escape(ch) {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                escaped.push_str(&format!("%{byte:02X}"));
            }
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

fn needs_escape(ch: char) -> bool {
    ch.is_control()
        || matches!(
            ch,
            '"' | '#'
                | '%'
                | '\''
                | '*'
                | '/'
                | ':'
                | '='
                | '?'
                | '\\'
                | '{'
                | '}'
                | '['
                | ']'
                | '^'
                | '<'
                | '>'
                | '|'
                | '~'
                | '`'
        )
}
