//! Tests for output module

use super::*;
use crate::storage::Storage;
use crate::transform::{ArtistRow, SongRow, SongplayRow, TimeParts, UserRow};
use arrow::array::{Array, Int32Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use object_store::memory::InMemory;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn song_row(song_id: &str, artist_id: Option<&str>, year: Option<i64>) -> SongRow {
    SongRow {
        song_id: Some(song_id.to_string()),
        title: Some(format!("Title {song_id}")),
        artist_id: artist_id.map(str::to_string),
        year,
        duration: Some(200.0),
    }
}

fn time_row(timestamp: &str, year: i32, month: i32) -> TimeParts {
    TimeParts {
        timestamp: timestamp.to_string(),
        hour: 10,
        day: 5,
        week: 45,
        month,
        year,
        weekday: "Mon".to_string(),
    }
}

fn read_parquet(data: Bytes) -> RecordBatch {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.map(Result::unwrap).collect();
    arrow::compute::concat_batches(&batches[0].schema(), &batches).unwrap()
}

fn memory_writer() -> TableWriter {
    let storage = Storage::from_store(Arc::new(InMemory::new()), "lake");
    TableWriter::new(storage, ParquetWriterConfig::default())
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_table_names_and_partitioning() {
    assert_eq!(SongRow::dir(), "songs.parquet");
    assert_eq!(ArtistRow::dir(), "artists.parquet");
    assert_eq!(UserRow::dir(), "users.parquet");
    assert_eq!(TimeParts::dir(), "time.parquet");
    assert_eq!(SongplayRow::dir(), "songplays.parquet");

    assert_eq!(SongRow::PARTITION_BY, &["year", "artist_id"]);
    assert!(ArtistRow::PARTITION_BY.is_empty());
    assert!(UserRow::PARTITION_BY.is_empty());
    assert_eq!(TimeParts::PARTITION_BY, &["year", "month"]);
    assert_eq!(SongplayRow::PARTITION_BY, &["year", "month"]);
}

#[test]
fn test_partition_columns_exist_in_schemas() {
    for (schema, columns) in [
        (SongRow::schema(), SongRow::PARTITION_BY),
        (TimeParts::schema(), TimeParts::PARTITION_BY),
        (SongplayRow::schema(), SongplayRow::PARTITION_BY),
    ] {
        for column in columns {
            assert!(schema.field_with_name(column).is_ok(), "{column} missing");
        }
    }
}

#[test]
fn test_songs_record_batch_keeps_nulls() {
    let rows = vec![song_row("S1", Some("A1"), Some(2001)), song_row("S2", None, None)];
    let batch = SongRow::to_record_batch(&rows).unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 5);
    assert_eq!(batch.schema().field(3).data_type(), &DataType::Int64);
    assert!(batch.column(2).is_null(1));
    assert!(batch.column(3).is_null(1));
}

#[test]
fn test_users_schema_uses_source_column_names() {
    let schema = UserRow::schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["userId", "firstName", "lastName", "gender", "level"]);
}

#[test]
fn test_empty_record_batch() {
    let batch = SongplayRow::to_record_batch(&[]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 10);
}

// ============================================================================
// Partitioning Tests
// ============================================================================

#[test]
fn test_partition_batch_groups_and_strips_columns() {
    let rows = vec![
        time_row("2018-11-05 10:00:00", 2018, 11),
        time_row("2018-12-05 10:00:00", 2018, 12),
        time_row("2018-11-06 10:00:00", 2018, 11),
    ];
    let batch = TimeParts::to_record_batch(&rows).unwrap();
    let partitions = partition_batch(&batch, TimeParts::PARTITION_BY).unwrap();

    let dirs: Vec<&str> = partitions.iter().map(|p| p.dir.as_str()).collect();
    assert_eq!(dirs, vec!["year=2018/month=11", "year=2018/month=12"]);

    let november = &partitions[0].batch;
    assert_eq!(november.num_rows(), 2);
    assert!(november.schema().field_with_name("year").is_err());
    assert!(november.schema().field_with_name("month").is_err());

    let timestamps = november
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(timestamps.value(0), "2018-11-05 10:00:00");
    assert_eq!(timestamps.value(1), "2018-11-06 10:00:00");
}

#[test]
fn test_partition_batch_null_and_escaped_values() {
    let rows = vec![
        song_row("S1", Some("AR/1:x"), Some(1999)),
        song_row("S2", None, None),
    ];
    let batch = SongRow::to_record_batch(&rows).unwrap();
    let partitions = partition_batch(&batch, SongRow::PARTITION_BY).unwrap();

    let dirs: Vec<&str> = partitions.iter().map(|p| p.dir.as_str()).collect();
    assert_eq!(
        dirs,
        vec![
            "year=1999/artist_id=AR%2F1%3Ax",
            "year=__HIVE_DEFAULT_PARTITION__/artist_id=__HIVE_DEFAULT_PARTITION__",
        ]
    );
}

#[test]
fn test_unpartitioned_is_single_partition() {
    let batch = UserRow::to_record_batch(&[]).unwrap();
    let partitions = partition_batch(&batch, &[]).unwrap();
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].dir, "");
    assert_eq!(partitions[0].batch.num_rows(), 0);
}

#[test]
fn test_partition_unknown_column() {
    let batch = UserRow::to_record_batch(&[]).unwrap();
    assert!(partition_batch(&batch, &["year"]).is_err());
}

#[test]
fn test_escape_path_name() {
    assert_eq!(escape_path_name("ARJIE2Y1187B994AB7"), "ARJIE2Y1187B994AB7");
    assert_eq!(escape_path_name("a=b"), "a%3Db");
    assert_eq!(escape_path_name("100%"), "100%25");
    assert_eq!(escape_path_name(""), DEFAULT_PARTITION_NAME);
    assert_eq!(escape_path_name("tab\there"), "tab%09here");
}

// ============================================================================
// Parquet Encoding Tests
// ============================================================================

#[test]
fn test_encode_parquet_round_trip() {
    let rows = vec![time_row("2018-11-05 10:00:00", 2018, 11)];
    let batch = TimeParts::to_record_batch(&rows).unwrap();

    let data = encode_parquet(&batch, &ParquetWriterConfig::default()).unwrap();
    let read = read_parquet(data);
    assert_eq!(read.num_rows(), 1);
    assert_eq!(read.columns(), batch.columns());
}

#[test]
fn test_writer_config_builders() {
    let config = ParquetWriterConfig::new()
        .zstd()
        .with_row_group_size(10);
    assert!(matches!(config.compression(), Compression::ZSTD(_)));
    assert_eq!(config.row_group_size(), 10);

    let batch = UserRow::to_record_batch(&[]).unwrap();
    assert!(encode_parquet(&batch, &config).is_ok());
}

#[test]
fn test_writer_config_from_settings() {
    let settings = crate::config::ParquetSettings {
        compression: crate::types::ParquetCompression::None,
        row_group_size: 42,
    };
    let config = ParquetWriterConfig::from(&settings);
    assert_eq!(config.compression(), Compression::UNCOMPRESSED);
    assert_eq!(config.row_group_size(), 42);
}

// ============================================================================
// Table Writer Tests
// ============================================================================

#[tokio::test]
async fn test_write_partitioned_table_layout() {
    let writer = memory_writer();
    let rows = vec![
        time_row("2018-11-05 10:00:00", 2018, 11),
        time_row("2018-12-05 10:00:00", 2018, 12),
    ];

    let stats = writer.write_table(&rows).await.unwrap();
    assert_eq!(stats.table, "time");
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.replaced, 0);
    assert_eq!(stats.location, "memory://lake/time.parquet");

    let keys = writer.destination().list("time.parquet").await.unwrap();
    assert_eq!(
        keys,
        vec![
            "time.parquet/_SUCCESS",
            "time.parquet/year=2018/month=11/part-00000.parquet",
            "time.parquet/year=2018/month=12/part-00000.parquet",
        ]
    );

    let data = writer
        .destination()
        .read("time.parquet/year=2018/month=12/part-00000.parquet")
        .await
        .unwrap();
    let batch = read_parquet(data);
    assert_eq!(batch.num_rows(), 1);
    let hours = batch
        .column_by_name("hour")
        .unwrap()
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(hours.value(0), 10);
}

#[tokio::test]
async fn test_write_overwrites_stale_partitions() {
    let writer = memory_writer();
    writer
        .write_table(&[
            time_row("2018-11-05 10:00:00", 2018, 11),
            time_row("2018-12-05 10:00:00", 2018, 12),
        ])
        .await
        .unwrap();

    let stats = writer
        .write_table(&[time_row("2018-11-05 10:00:00", 2018, 11)])
        .await
        .unwrap();
    assert_eq!(stats.replaced, 3);

    let keys = writer.destination().list("time.parquet").await.unwrap();
    assert_eq!(
        keys,
        vec![
            "time.parquet/_SUCCESS",
            "time.parquet/year=2018/month=11/part-00000.parquet",
        ]
    );
}

#[tokio::test]
async fn test_write_unpartitioned_empty_table() {
    let writer = memory_writer();
    let stats = writer.write_table::<UserRow>(&[]).await.unwrap();
    assert_eq!(stats.rows, 0);
    assert_eq!(stats.files, 1);

    let data = writer
        .destination()
        .read("users.parquet/part-00000.parquet")
        .await
        .unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(data).unwrap();
    assert_eq!(reader.schema().fields().len(), 5);
}

#[tokio::test]
async fn test_write_partitioned_empty_table() {
    let writer = memory_writer();
    let stats = writer.write_table::<SongplayRow>(&[]).await.unwrap();
    assert_eq!(stats.files, 0);
    assert_eq!(
        writer.destination().list("songplays.parquet").await.unwrap(),
        vec!["songplays.parquet/_SUCCESS"]
    );
}
