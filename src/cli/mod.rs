//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Run both stages
//! - `songs` - Song stage only
//! - `logs` - Log stage only
//! - `validate` - Check the configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, SongplayIdArg};
pub use runner::Runner;
