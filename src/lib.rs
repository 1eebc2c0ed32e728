//! # Steward - Schema Registry and Data Quality Library
//!
//! Steward keeps a curated schema registry (the project's "data dictionary")
//! in step with the tabular data files of a research project, and gates data
//! quality against the declarations recorded there.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use steward::dictionary::{self, Registry};
//! use steward::quality;
//!
//! # fn example() -> anyhow::Result<()> {
//! // Reconcile the registry with the files under data/
//! let mut registry = Registry::new();
//! let summary = dictionary::synchronize(Path::new("data"), &mut registry);
//! println!("Tracked {} files", summary.files_seen);
//!
//! // Persist it, then validate the data against it
//! dictionary::save_registry(&registry, Path::new("data_dictionary.json"))?;
//! let report = quality::validate(Path::new("."), &registry);
//! assert!(report.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`dictionary`]: registry types, persistence, and synchronization
//! - [`quality`]: column rule evaluation and the validation report
//! - [`tabular`]: raw-text access to tabular data files
//! - [`naming`]: file naming convention compliance
//! - [`expectations`]: expectation suite export
//! - [`catalog`]: deposit metadata generation
//! - [`config`]: project configuration file handling
//! - [`utils`]: common utility functions
//!
//! The synchronizer preserves every curator-authored field for columns it has
//! seen before and drops columns whose names left a file's header, so the
//! registry always mirrors the data as it is now. The validator never mutates
//! the registry; it reports findings per file and per column and leaves exit
//! semantics to the caller.

#![warn(clippy::all, rust_2018_idioms)]

pub mod catalog;
pub mod config;
pub mod dictionary;
pub mod expectations;
pub mod logging;
pub mod naming;
pub mod quality;
pub mod tabular;
pub mod utils;
