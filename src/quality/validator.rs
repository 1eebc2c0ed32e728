//! Registry-driven validation of data files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::warn;

use super::checks;
use super::report::{FileIssue, FileReport, Report, UNDECLARED_FILE_ERROR};
use crate::dictionary::{DictionaryEntry, Registry};
use crate::tabular::{self, Row};

/// Validate every registry entry against the files on disk.
///
/// Relative entry paths resolve against `base_dir`; absolute paths are used
/// as stored. The registry is never mutated, and a finding for one file
/// never stops validation of the others. Files without findings are absent
/// from the report.
pub fn validate(base_dir: &Path, registry: &Registry) -> Report {
    let mut report = Report::new();
    for (file_name, entry) in registry.entries() {
        if let Some(file_report) = validate_entry(base_dir, entry) {
            report.insert(file_name.clone(), file_report);
        }
    }
    report
}

fn validate_entry(base_dir: &Path, entry: &DictionaryEntry) -> Option<FileReport> {
    let path = base_dir.join(&entry.path);
    if entry.columns.is_empty() || !path.is_file() {
        return Some(FileReport::Error {
            message: UNDECLARED_FILE_ERROR.to_owned(),
        });
    }

    let (header, rows) = match tabular::read_rows(&path) {
        Ok(reader) => {
            let header = reader.header().to_vec();
            let rows: Vec<Row> = reader.collect();
            (header, rows)
        }
        Err(err) => {
            warn!("Could not read {} for validation: {err:#}", path.display());
            (Vec::new(), Vec::new())
        }
    };

    let data_columns: BTreeSet<&str> = header.iter().map(String::as_str).collect();
    let dict_columns: BTreeSet<&str> =
        entry.columns.iter().map(|spec| spec.variable_name.as_str()).collect();

    let mut file_issues = Vec::new();
    let missing: Vec<String> =
        dict_columns.difference(&data_columns).map(|&name| name.to_owned()).collect();
    if !missing.is_empty() {
        file_issues.push(FileIssue::MissingColumns(missing));
    }
    let extra: Vec<String> =
        data_columns.difference(&dict_columns).map(|&name| name.to_owned()).collect();
    if !extra.is_empty() {
        file_issues.push(FileIssue::ExtraColumns(extra));
    }

    let mut column_issues = BTreeMap::new();
    for spec in &entry.columns {
        if !data_columns.contains(spec.variable_name.as_str()) {
            continue;
        }
        let values: Vec<Option<&str>> = rows
            .iter()
            .map(|row| row.get(&spec.variable_name).map(String::as_str))
            .collect();
        let mut issues = Vec::new();
        checks::check_column(spec, &values, &mut issues);
        if !issues.is_empty() {
            column_issues.insert(spec.variable_name.clone(), issues);
        }
    }

    if file_issues.is_empty() && column_issues.is_empty() {
        return None;
    }
    Some(FileReport::Issues {
        file_issues,
        column_issues,
    })
}
