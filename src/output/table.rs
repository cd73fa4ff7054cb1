//! Table writer with overwrite semantics

use super::partition::partition_batch;
use super::schema::Table;
use super::writer::{encode_parquet, ParquetWriterConfig};
use crate::error::{Result, ResultExt};
use crate::storage::Storage;
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

/// Name of the marker written after a table's data files
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// File name of the data file inside each partition directory
pub const PART_FILE: &str = "part-00000.parquet";

/// Outcome of writing one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Table name
    pub table: String,
    /// Rows written
    pub rows: usize,
    /// Data files written
    pub files: usize,
    /// Stale objects removed before writing
    pub replaced: usize,
    /// Table directory URL
    pub location: String,
}

/// Writes whole tables under an output root
///
/// Every write replaces the table: all objects under the table directory
/// are deleted first, so partitions that vanished from the input do not
/// survive a rerun.
#[derive(Debug, Clone)]
pub struct TableWriter {
    destination: Storage,
    config: ParquetWriterConfig,
}

impl TableWriter {
    /// Create a writer for an output root
    pub fn new(destination: Storage, config: ParquetWriterConfig) -> Self {
        debug!(
            "Parquet output: {:?} compression, row groups of {} rows",
            config.compression(),
            config.row_group_size()
        );
        Self {
            destination,
            config,
        }
    }

    /// The output root
    pub fn destination(&self) -> &Storage {
        &self.destination
    }

    /// Replace table `T` with `rows`
    pub async fn write_table<T: Table>(&self, rows: &[T]) -> Result<TableStats> {
        let dir = T::dir();
        let batch = T::to_record_batch(rows)?;
        let partitions = partition_batch(&batch, T::PARTITION_BY)?;

        let replaced = self.destination.delete_dir(&dir).await?;
        if replaced > 0 {
            debug!("Removed {} stale objects from {}", replaced, dir);
        }

        let mut files = 0;
        for partition in &partitions {
            let key = if partition.dir.is_empty() {
                format!("{dir}/{PART_FILE}")
            } else {
                format!("{dir}/{}/{PART_FILE}", partition.dir)
            };
            let data = encode_parquet(&partition.batch, &self.config)
                .with_context(|| format!("Encoding {} partition '{}'", T::NAME, partition.dir))?;
            let url = self.destination.write(&key, data).await?;
            debug!("Wrote {} rows to {}", partition.batch.num_rows(), url);
            files += 1;
        }

        self.destination
            .write(&format!("{dir}/{SUCCESS_MARKER}"), Bytes::new())
            .await?;

        let location = self.destination.display_key(&dir);
        info!(
            "Wrote table {} ({} rows, {} files) to {}",
            T::NAME,
            batch.num_rows(),
            files,
            location
        );

        Ok(TableStats {
            table: T::NAME.to_string(),
            rows: batch.num_rows(),
            files,
            replaced,
            location,
        })
    }
}
