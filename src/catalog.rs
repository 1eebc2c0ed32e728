//! Deposit metadata generation for catalog uploads.
//!
//! Converts a two-column `field,value` CSV into the JSON document a
//! Zenodo-style deposit expects. List-valued fields split on `;`: keywords
//! stay plain strings, communities become `{identifier}` records, and
//! creators written as `Name|Affiliation` become `{name, affiliation}`
//! records.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use serde_json::{Map, Value, json};

/// Rows of the starter template, in write order.
const TEMPLATE_ROWS: [(&str, &str); 7] = [
    ("title", "My Research Data Project"),
    ("upload_type", "dataset"),
    ("description", "A FAIR-compliant research data management project."),
    ("creators", "Your Name|Your Institution"),
    ("communities", "your-community"),
    ("keywords", "FAIR;RDM;research-data"),
    ("license", "MIT"),
];

/// Write a starter metadata CSV for the steward to fill in.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_template(csv_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create metadata template {}", csv_path.display()))?;
    writer.write_record(["field", "value"]).context("Failed to write template header")?;
    for (field, value) in TEMPLATE_ROWS {
        writer
            .write_record([field, value])
            .with_context(|| format!("Failed to write template row '{field}'"))?;
    }
    writer.flush().context("Failed to flush metadata template")?;
    Ok(())
}

/// Convert a filled-in metadata CSV into deposit JSON at `out_path`.
///
/// # Errors
///
/// Returns an error when the CSV cannot be read, lacks the `field` and
/// `value` columns, or the output cannot be written.
pub fn generate_deposit(csv_path: &Path, out_path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open metadata CSV {}", csv_path.display()))?;
    let headers = reader.headers().context("Failed to read metadata header")?.clone();
    let field_index = headers.iter().position(|heading| heading == "field");
    let value_index = headers.iter().position(|heading| heading == "value");
    let (Some(field_index), Some(value_index)) = (field_index, value_index) else {
        bail!(
            "Metadata CSV {} must have 'field' and 'value' columns",
            csv_path.display()
        );
    };

    let mut deposit = Map::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("Failed to read metadata row in {}", csv_path.display()))?;
        let field = record.get(field_index).unwrap_or_default().trim();
        let value = record.get(value_index).unwrap_or_default().trim();
        if field.is_empty() {
            continue;
        }
        deposit.insert(field.to_owned(), field_value(field, value));
    }

    let rendered = serde_json::to_string_pretty(&Value::Object(deposit))
        .context("Failed to serialize deposit metadata")?;
    fs::write(out_path, rendered)
        .with_context(|| format!("Failed to write deposit metadata {}", out_path.display()))?;
    Ok(())
}

/// Expand list-valued fields; everything else stays a plain string.
fn field_value(field: &str, value: &str) -> Value {
    match field {
        "keywords" => {
            Value::Array(split_list(value).map(|keyword| Value::String(keyword.to_owned())).collect())
        }
        "communities" => Value::Array(
            split_list(value).map(|community| json!({ "identifier": community })).collect(),
        ),
        "creators" => Value::Array(split_list(value).map(creator_record).collect()),
        _ => Value::String(value.to_owned()),
    }
}

/// `Name|Affiliation` becomes a two-field record; any other shape keeps the
/// whole text as the name.
fn creator_record(creator: &str) -> Value {
    let parts: Vec<&str> = creator.split('|').collect();
    match parts.as_slice() {
        [name, affiliation] => json!({ "name": name.trim(), "affiliation": affiliation.trim() }),
        _ => json!({ "name": creator }),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|part| !part.is_empty())
}
