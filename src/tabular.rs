//! Raw-text access to tabular data files.
//!
//! Readers here never interpret values. Every field is handed to callers as
//! the exact string found in the file; deciding what a string means is the
//! job of the dictionary and quality layers.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::warn;

/// File extension (case-insensitive) recognized as tabular data.
pub const TABULAR_EXTENSION: &str = "csv";

/// One data row as an ordered column name -> raw value mapping.
///
/// Columns missing from a short record are absent from the map, which is
/// distinct from being present with an empty value.
pub type Row = BTreeMap<String, String>;

/// Returns true when `path` carries the tabular data extension.
pub fn is_tabular(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TABULAR_EXTENSION))
}

/// Read the ordered header of a tabular file.
///
/// Non-tabular files, unreadable files, and structurally broken files all
/// yield an empty header; the two failure cases log a warning. An empty
/// header means "schema unknown", never a fatal condition, so directory
/// scans keep going past files that cannot be parsed.
pub fn read_header(path: &Path) -> Vec<String> {
    if !is_tabular(path) {
        return Vec::new();
    }

    let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(err) => {
            warn!("Could not open {} as tabular data: {err}", path.display());
            return Vec::new();
        }
    };

    match reader.headers() {
        Ok(headers) => headers.iter().map(str::to_owned).collect(),
        Err(err) => {
            warn!("Could not read header of {}: {err}", path.display());
            Vec::new()
        }
    }
}

/// Open a fresh row iterator over a tabular file.
///
/// Every call opens the file anew, so callers never observe a read position
/// left behind by an earlier iteration. Rows are produced lazily; records
/// that fail to parse are skipped with a warning rather than ending the
/// iteration.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or its header cannot be
/// read.
pub fn read_rows(path: &Path) -> Result<Rows> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {} as tabular data", path.display()))?;

    let header: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(str::to_owned)
        .collect();

    Ok(Rows {
        header,
        records: reader.into_records(),
        path: path.to_path_buf(),
    })
}

/// Lazy iterator over the data rows of one tabular file.
pub struct Rows {
    header: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
    path: PathBuf,
}

impl Rows {
    /// Column names in file order.
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        loop {
            match self.records.next()? {
                Ok(record) => {
                    return Some(
                        self.header
                            .iter()
                            .cloned()
                            .zip(record.iter().map(str::to_owned))
                            .collect(),
                    );
                }
                Err(err) => {
                    warn!("Skipping malformed record in {}: {err}", self.path.display());
                }
            }
        }
    }
}
