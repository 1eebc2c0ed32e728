//! Validation report types.
//!
//! Findings are typed so callers and tests can match on them; `Display`
//! renders the line a steward reads. Serialization goes through the rendered
//! strings, keeping the JSON form stable for scripting.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Message attached to a file that cannot be validated at all.
pub const UNDECLARED_FILE_ERROR: &str = "File missing or no columns defined in data dictionary.";

/// File-level mismatch between the registry and a data file's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileIssue {
    /// Declared columns absent from the data file, sorted by name.
    MissingColumns(Vec<String>),
    /// Data file columns never declared in the registry, sorted by name.
    ExtraColumns(Vec<String>),
}

impl fmt::Display for FileIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns(names) => write!(f, "Missing columns in data: {names:?}"),
            Self::ExtraColumns(names) => write!(f, "Extra columns in data: {names:?}"),
        }
    }
}

impl Serialize for FileIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One violation of a declared column rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnIssue {
    /// Raw values that failed the declared type, in row order.
    TypeErrors(Vec<String>),
    /// A value outside the declared numeric range.
    OutOfRange(String),
    /// A value outside the declared allowed set.
    InvalidValue(String),
    /// Sorted set of values that occurred more than once.
    DuplicateValues(Vec<String>),
    /// Zero-based row indices holding null or missing values.
    NullValues(Vec<usize>),
}

impl fmt::Display for ColumnIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeErrors(values) => write!(f, "Type errors: {values:?}"),
            Self::OutOfRange(value) => write!(f, "Out of range: {value}"),
            Self::InvalidValue(value) => write!(f, "Invalid value: {value}"),
            Self::DuplicateValues(values) => write!(f, "Duplicate values: {values:?}"),
            Self::NullValues(rows) => write!(f, "Null/missing values at rows: {rows:?}"),
        }
    }
}

impl Serialize for ColumnIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Findings for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileReport {
    /// The file could not be validated at all.
    Error {
        #[serde(rename = "error")]
        message: String,
    },
    /// The file was validated and produced at least one finding.
    Issues {
        file_issues: Vec<FileIssue>,
        column_issues: BTreeMap<String, Vec<ColumnIssue>>,
    },
}

/// Outcome of one validation run, keyed by file name.
///
/// Files that passed every check are absent, so an empty report is the pass
/// signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    files: BTreeMap<String, FileReport>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files with findings.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when every tracked file passed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, file_name: &str) -> Option<&FileReport> {
        self.files.get(file_name)
    }

    pub(crate) fn insert(&mut self, file_name: String, report: FileReport) {
        self.files.insert(file_name, report);
    }

    /// All findings keyed by file name, in sorted order.
    pub fn files(&self) -> &BTreeMap<String, FileReport> {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_issue_rendering() {
        let issue = FileIssue::MissingColumns(vec!["age".to_owned(), "id".to_owned()]);
        assert_eq!(issue.to_string(), r#"Missing columns in data: ["age", "id"]"#);

        let issue = FileIssue::ExtraColumns(vec!["ghost".to_owned()]);
        assert_eq!(issue.to_string(), r#"Extra columns in data: ["ghost"]"#);
    }

    #[test]
    fn test_column_issue_rendering() {
        assert_eq!(
            ColumnIssue::TypeErrors(vec!["foo".to_owned()]).to_string(),
            r#"Type errors: ["foo"]"#
        );
        assert_eq!(ColumnIssue::OutOfRange("15".to_owned()).to_string(), "Out of range: 15");
        assert_eq!(ColumnIssue::InvalidValue("C".to_owned()).to_string(), "Invalid value: C");
        assert_eq!(
            ColumnIssue::DuplicateValues(vec!["1".to_owned()]).to_string(),
            r#"Duplicate values: ["1"]"#
        );
        assert_eq!(
            ColumnIssue::NullValues(vec![0, 2]).to_string(),
            "Null/missing values at rows: [0, 2]"
        );
    }

    #[test]
    fn test_error_report_serializes_with_error_key() {
        let mut report = Report::new();
        report.insert(
            "a.csv".to_owned(),
            FileReport::Error {
                message: UNDECLARED_FILE_ERROR.to_owned(),
            },
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["a.csv"]["error"], UNDECLARED_FILE_ERROR);
    }

    #[test]
    fn test_issue_report_serializes_rendered_strings() {
        let mut column_issues = BTreeMap::new();
        column_issues.insert("id".to_owned(), vec![ColumnIssue::TypeErrors(vec!["x".to_owned()])]);
        let mut report = Report::new();
        report.insert(
            "a.csv".to_owned(),
            FileReport::Issues {
                file_issues: vec![FileIssue::ExtraColumns(vec!["ghost".to_owned()])],
                column_issues,
            },
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["a.csv"]["file_issues"][0], r#"Extra columns in data: ["ghost"]"#);
        assert_eq!(json["a.csv"]["column_issues"]["id"][0], r#"Type errors: ["x"]"#);
    }

    #[test]
    fn test_empty_report_is_the_pass_signal() {
        let report = Report::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(serde_json::to_string(&report).unwrap(), "{}");
    }
}
