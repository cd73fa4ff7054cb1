//! # Sparkify Lake
//!
//! Batch pipeline that turns the raw song metadata and listening-log JSON
//! datasets into a Parquet star schema.
//!
//! ## Tables
//!
//! | Table | Source | Partitioned by |
//! |---|---|---|
//! | `songs` | song data | `year`, `artist_id` |
//! | `artists` | song data | - |
//! | `users` | log data (plays) | - |
//! | `time` | log data (plays) | `year`, `month` |
//! | `songplays` | log data joined to song data | `year`, `month` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sparkify_lake::{Pipeline, PipelineConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::new("s3a://udacity-dend/", "s3://my-bucket/lake/");
//!     let stats = Pipeline::new(config)?.run().await?;
//!     println!("{} songplays", stats.log_stage.songplays.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────────────┐   ┌──────────────────┐
//! │   source     │   │        transform          │   │     output       │
//! │ glob + JSON  │──▶│ songs / artists           │──▶│ Arrow batches    │
//! │ lines reader │   │ plays → users / time      │   │ Hive partitions  │
//! │              │   │ plays ⋈ songs → songplays │   │ Parquet, replace │
//! └──────────────┘   └───────────────────────────┘   └──────────────────┘
//!        ▲                                                   │
//!        └──────────────── storage (object_store) ◀──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pipeline configuration
pub mod config;

/// Object storage roots and glob matching
pub mod storage;

/// Raw dataset reading
pub mod source;

/// Star-schema derivations
pub mod transform;

/// Arrow/Parquet output
pub mod output;

/// Pipeline execution
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PipelineConfig;
pub use engine::{Pipeline, RunStats};
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
