//! Core types of the schema registry.
//!
//! The serialized field names are the headings stewards see in spreadsheet
//! exports, so renames here are part of the on-disk format.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Declared metadata for one column of one tracked file.
///
/// Every field except `variable_name` is curator-authored prose. The
/// synchronizer creates new specs with those fields empty and must never
/// overwrite them for a column it already knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// Column name exactly as it appears in the file header.
    #[serde(rename = "Variable Name")]
    pub variable_name: String,
    /// What the column means.
    #[serde(rename = "Description")]
    pub description: String,
    /// Declared type: `integer`, `float`, `decimal`, `boolean`, `date`,
    /// `string`, or free text (unrecognized types are not checked).
    #[serde(rename = "Data Type")]
    pub data_type: String,
    /// Measurement units, if any.
    #[serde(rename = "Units")]
    pub units: String,
    /// Either a numeric range like `0-10` or a comma-separated set of
    /// allowed values.
    #[serde(rename = "Allowed Values / Range")]
    pub allowed_values: String,
    /// Sentinel string that marks a deliberately missing value.
    #[serde(rename = "Missing Value Representation")]
    pub missing_value: String,
    /// Where the data comes from.
    #[serde(rename = "Source")]
    pub source: String,
    /// Free-text constraints; `unique`, `not null`, and `cannot be null`
    /// are recognized by the validator.
    #[serde(rename = "Constraints / Validation Rules")]
    pub constraints: String,
    #[serde(rename = "Notes / Comments")]
    pub notes: String,
    #[serde(rename = "Example Value")]
    pub example_value: String,
}

impl ColumnSpec {
    /// A fresh spec for a newly discovered column, every curator field empty.
    pub fn named(variable_name: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
            ..Self::default()
        }
    }
}

/// One tracked file: its discovered path and its declared columns, in the
/// order they were last seen in the file's header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryEntry {
    /// Path the file was discovered at, as recorded by the last
    /// synchronization. Empty when the registry was loaded from a format
    /// that does not carry paths.
    pub path: String,
    pub columns: Vec<ColumnSpec>,
}

/// The schema registry: file basename -> declared schema.
///
/// Backed by a `BTreeMap` so iteration and serialization order is stable
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<String, DictionaryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, file_name: &str) -> Option<&DictionaryEntry> {
        self.entries.get(file_name)
    }

    pub fn insert(&mut self, file_name: String, entry: DictionaryEntry) {
        self.entries.insert(file_name, entry);
    }

    /// Entry for `file_name`, created empty on first access.
    pub fn entry_mut(&mut self, file_name: impl Into<String>) -> &mut DictionaryEntry {
        self.entries.entry(file_name.into()).or_default()
    }

    /// All entries keyed by file basename, in sorted order.
    pub fn entries(&self) -> &BTreeMap<String, DictionaryEntry> {
        &self.entries
    }

    /// Reject structurally broken registries.
    ///
    /// A well-formed entry names every column and never declares the same
    /// column twice. Persistence runs this after every load so the rest of
    /// the crate can rely on it.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending file and column.
    pub fn validate(&self) -> Result<()> {
        for (file_name, entry) in &self.entries {
            let mut seen = BTreeSet::new();
            for column in &entry.columns {
                if column.variable_name.is_empty() {
                    bail!("Registry entry '{file_name}' has a column with an empty variable name");
                }
                if !seen.insert(column.variable_name.as_str()) {
                    bail!(
                        "Registry entry '{file_name}' declares column '{}' more than once",
                        column.variable_name
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_spec_leaves_curator_fields_empty() {
        let spec = ColumnSpec::named("id");
        assert_eq!(spec.variable_name, "id");
        assert!(spec.description.is_empty());
        assert!(spec.data_type.is_empty());
        assert!(spec.constraints.is_empty());
    }

    #[test]
    fn test_column_spec_serializes_with_spreadsheet_headings() {
        let spec = ColumnSpec::named("id");
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"Variable Name\":\"id\""));
        assert!(json.contains("\"Allowed Values / Range\""));
        assert!(json.contains("\"Missing Value Representation\""));
    }

    #[test]
    fn test_column_spec_deserializes_with_missing_fields() {
        let spec: ColumnSpec = serde_json::from_str(r#"{"Variable Name": "id"}"#).unwrap();
        assert_eq!(spec.variable_name, "id");
        assert!(spec.description.is_empty());
    }

    #[test]
    fn test_registry_serializes_as_plain_map() {
        let mut registry = Registry::new();
        registry.insert(
            "a.csv".to_owned(),
            DictionaryEntry {
                path: "data/a.csv".to_owned(),
                columns: vec![ColumnSpec::named("id")],
            },
        );
        let json = serde_json::to_value(&registry).unwrap();
        assert!(json.is_object());
        assert_eq!(json["a.csv"]["path"], "data/a.csv");
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let mut registry = Registry::new();
        registry.insert(
            "a.csv".to_owned(),
            DictionaryEntry {
                path: "a.csv".to_owned(),
                columns: vec![ColumnSpec::named("id"), ColumnSpec::named("id")],
            },
        );
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"), "got: {err}");
    }

    #[test]
    fn test_validate_rejects_unnamed_columns() {
        let mut registry = Registry::new();
        registry.entry_mut("a.csv").columns.push(ColumnSpec::default());
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_registry() {
        let mut registry = Registry::new();
        registry.entry_mut("a.csv").columns.push(ColumnSpec::named("id"));
        registry.entry_mut("b.csv").columns.push(ColumnSpec::named("id"));
        assert!(registry.validate().is_ok());
    }
}
