//! Output module
//!
//! Turns derived rows into Parquet tables under the output root.
//!
//! # Overview
//!
//! This module provides:
//! - `Table` - Arrow schema and partitioning of each star-schema table
//! - `partition_batch` - Hive-style partition splitting
//! - `encode_parquet` / `ParquetWriterConfig` - Parquet encoding
//! - `TableWriter` - full-overwrite table writes

mod partition;
mod schema;
mod table;
mod writer;

pub use partition::{escape_path_name, partition_batch, Partition, DEFAULT_PARTITION_NAME};
pub use schema::Table;
pub use table::{TableStats, TableWriter, PART_FILE, SUCCESS_MARKER};
pub use writer::{encode_parquet, ParquetWriterConfig};

#[cfg(test)]
mod tests;
