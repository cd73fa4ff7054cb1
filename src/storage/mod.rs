//! Storage module
//!
//! Object-store roots for the raw input and the output lake.
//!
//! # Overview
//!
//! This module provides:
//! - `Storage` - a root URL resolved to an object store plus key prefix
//! - `Glob` - glob patterns used to select input files

mod glob;
mod store;

pub use glob::Glob;
pub use store::Storage;
