//! Schema registry ("data dictionary") for tracked data files.
//!
//! This module owns the registry data model, its persistence formats, and the
//! synchronizer that reconciles the registry with the files on disk.
//!
//! ## Core Concepts
//!
//! - **Registry**: mapping of file basename to the file's declared schema
//! - **Column Spec**: one column's curator-authored metadata (description,
//!   declared type, allowed values, constraints, ...)
//! - **Synchronization**: a directory walk that adds newly discovered files
//!   and columns, preserves curated fields, and drops columns that left a
//!   file's header
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use steward::dictionary::{self, Registry};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut registry = dictionary::load_registry(Path::new("data_dictionary.json"))?;
//! let summary = dictionary::synchronize(Path::new("data"), &mut registry);
//! println!("{} new files tracked", summary.entries_created);
//! dictionary::save_registry(&registry, Path::new("data_dictionary.json"))?;
//! # Ok(())
//! # }
//! ```

pub mod schema;
pub mod storage;
pub mod sync;

pub use schema::{ColumnSpec, DictionaryEntry, Registry};
pub use storage::{load_registry, save_registry};
pub use sync::{SyncSummary, synchronize};
