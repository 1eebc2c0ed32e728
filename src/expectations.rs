//! Export of a registry entry as a declarative expectation suite.
//!
//! The output follows the Great Expectations suite layout: a suite name plus
//! a list of `{expectation_type, kwargs}` records, one batch per declared
//! column. Only declarations the registry can express are emitted; a `date`
//! type has no suite counterpart and contributes nothing beyond the
//! existence expectation.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde_json::{Value, json};

use crate::dictionary::{ColumnSpec, DictionaryEntry};
use crate::quality::checks::{allowed_set, numeric_range};

/// Suite name used when the caller does not provide one.
pub const DEFAULT_SUITE_NAME: &str = "data_dictionary_suite";

/// Build the expectation list for every declared column of `entry`.
pub fn build_expectations(entry: &DictionaryEntry) -> Vec<Value> {
    let mut expectations = Vec::new();
    for spec in &entry.columns {
        push_column_expectations(spec, &mut expectations);
    }
    expectations
}

/// Write the suite for `entry` as pretty JSON.
///
/// # Errors
///
/// Returns an error when the output directory cannot be created or the file
/// cannot be written.
pub fn write_suite(entry: &DictionaryEntry, suite_name: &str, out_path: &Path) -> Result<()> {
    let suite = json!({
        "expectation_suite_name": suite_name,
        "expectations": build_expectations(entry),
    });
    let rendered =
        serde_json::to_string_pretty(&suite).context("Failed to serialize expectation suite")?;

    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    fs::write(out_path, rendered)
        .with_context(|| format!("Failed to write expectation suite {}", out_path.display()))?;
    Ok(())
}

fn push_column_expectations(spec: &ColumnSpec, expectations: &mut Vec<Value>) {
    let column = spec.variable_name.as_str();
    expectations.push(json!({
        "expectation_type": "expect_column_to_exist",
        "kwargs": { "column": column },
    }));

    let data_type = spec.data_type.to_lowercase();
    match data_type.as_str() {
        "integer" => expectations.push(type_expectation(column, "int")),
        "float" | "decimal" => expectations.push(type_expectation(column, "float")),
        "string" => expectations.push(type_expectation(column, "str")),
        "boolean" => expectations.push(json!({
            "expectation_type": "expect_column_values_to_be_in_set",
            "kwargs": {
                "column": column,
                "value_set": ["true", "false", "0", "1", "yes", "no"],
            },
        })),
        _ => {}
    }

    let allowed = spec.allowed_values.as_str();
    if !allowed.is_empty() && !allowed.eq_ignore_ascii_case("nan") {
        let numeric = matches!(data_type.as_str(), "integer" | "float" | "decimal");
        if numeric && let Some((min, max)) = numeric_range(allowed) {
            expectations.push(json!({
                "expectation_type": "expect_column_values_to_be_between",
                "kwargs": { "column": column, "min_value": min, "max_value": max },
            }));
        } else {
            let members = allowed_set(allowed);
            if !members.is_empty() {
                expectations.push(json!({
                    "expectation_type": "expect_column_values_to_be_in_set",
                    "kwargs": { "column": column, "value_set": members },
                }));
            }
        }
    }

    let constraints = spec.constraints.to_lowercase();
    if constraints.contains("unique") {
        expectations.push(json!({
            "expectation_type": "expect_column_values_to_be_unique",
            "kwargs": { "column": column },
        }));
    }
    if constraints.contains("not null") || constraints.contains("cannot be null") {
        expectations.push(json!({
            "expectation_type": "expect_column_values_to_not_be_null",
            "kwargs": { "column": column },
        }));
    }
}

fn type_expectation(column: &str, type_name: &str) -> Value {
    json!({
        "expectation_type": "expect_column_values_to_be_of_type",
        "kwargs": { "column": column, "type_": type_name },
    })
}
