//! Persistence for the schema registry.
//!
//! Two snapshot formats, chosen by output path extension: `.json` keeps the
//! full record including file paths, `.csv` is a flattened one-row-per-column
//! table for spreadsheet review. Writes go to a sibling temporary file first
//! and land via rename, so a crash mid-write never leaves a half-written
//! snapshot behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use super::schema::{ColumnSpec, Registry};

/// Field order of the flattened tabular form: `Filename` followed by the ten
/// column spec headings.
const FLAT_HEADER: [&str; 11] = [
    "Filename",
    "Variable Name",
    "Description",
    "Data Type",
    "Units",
    "Allowed Values / Range",
    "Missing Value Representation",
    "Source",
    "Constraints / Validation Rules",
    "Notes / Comments",
    "Example Value",
];

enum Format {
    Json,
    Csv,
}

fn format_of(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "json" => Ok(Format::Json),
        "csv" => Ok(Format::Csv),
        _ => bail!(
            "Unsupported registry format for {} (expected a .json or .csv path)",
            path.display()
        ),
    }
}

/// Load a registry snapshot from `path`, rejecting malformed entries.
///
/// The flattened CSV form carries no file paths, so entries loaded from it
/// come back with empty `path` fields.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, when its
/// extension names no known format, or when the loaded registry fails
/// [`Registry::validate`].
pub fn load_registry(path: &Path) -> Result<Registry> {
    let registry = match format_of(path)? {
        Format::Json => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read registry snapshot {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse registry snapshot {}", path.display()))?
        }
        Format::Csv => load_flattened(path)?,
    };
    registry.validate()?;
    Ok(registry)
}

/// Persist a registry snapshot to `path`, creating parent directories as
/// needed.
///
/// # Errors
///
/// Returns an error when the extension names no known format or any write
/// step fails.
pub fn save_registry(registry: &Registry, path: &Path) -> Result<()> {
    let format = format_of(path)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create registry directory {}", parent.display()))?;
    }

    let temp_path = sibling_temp_path(path);
    match format {
        Format::Json => {
            let json =
                serde_json::to_string_pretty(registry).context("Failed to serialize registry")?;
            fs::write(&temp_path, json)
                .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        }
        Format::Csv => save_flattened(registry, &temp_path)?,
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        fs::copy(&temp_path, path)
            .with_context(|| format!("Failed to move registry into place (rename error: {e})"))?;
        let _ = fs::remove_file(&temp_path);
    }
    Ok(())
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn load_flattened(path: &Path) -> Result<Registry> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open flattened registry {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read flattened registry header of {}", path.display()))?
        .clone();

    let mut registry = Registry::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to read row {} of {}", index + 2, path.display()))?;
        let field = |name: &str| -> String {
            headers
                .iter()
                .position(|heading| heading == name)
                .and_then(|position| record.get(position))
                .unwrap_or_default()
                .to_owned()
        };

        let file_name = field("Filename");
        if file_name.is_empty() {
            bail!("Row {} of {} has no Filename", index + 2, path.display());
        }
        registry.entry_mut(file_name).columns.push(ColumnSpec {
            variable_name: field("Variable Name"),
            description: field("Description"),
            data_type: field("Data Type"),
            units: field("Units"),
            allowed_values: field("Allowed Values / Range"),
            missing_value: field("Missing Value Representation"),
            source: field("Source"),
            constraints: field("Constraints / Validation Rules"),
            notes: field("Notes / Comments"),
            example_value: field("Example Value"),
        });
    }
    Ok(registry)
}

fn save_flattened(registry: &Registry, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create flattened registry {}", path.display()))?;
    writer
        .write_record(FLAT_HEADER)
        .context("Failed to write flattened registry header")?;

    for (file_name, entry) in registry.entries() {
        for spec in &entry.columns {
            writer
                .write_record([
                    file_name.as_str(),
                    spec.variable_name.as_str(),
                    spec.description.as_str(),
                    spec.data_type.as_str(),
                    spec.units.as_str(),
                    spec.allowed_values.as_str(),
                    spec.missing_value.as_str(),
                    spec.source.as_str(),
                    spec.constraints.as_str(),
                    spec.notes.as_str(),
                    spec.example_value.as_str(),
                ])
                .with_context(|| format!("Failed to write flattened row for {file_name}"))?;
        }
    }
    writer.flush().context("Failed to flush flattened registry")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryEntry;
    use std::fs;
    use tempfile::tempdir;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        let mut id = ColumnSpec::named("id");
        id.data_type = "integer".to_owned();
        id.constraints = "unique, not null".to_owned();
        let mut score = ColumnSpec::named("score");
        score.data_type = "float".to_owned();
        score.allowed_values = "0-10".to_owned();
        registry.insert(
            "samples.csv".to_owned(),
            DictionaryEntry {
                path: "data/samples.csv".to_owned(),
                columns: vec![id, score],
            },
        );
        registry
    }

    #[test]
    fn test_json_round_trip_preserves_everything() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("registry.json");
        let registry = sample_registry();

        save_registry(&registry, &path)?;
        let loaded = load_registry(&path)?;
        assert_eq!(loaded, registry);
        Ok(())
    }

    #[test]
    fn test_save_creates_parent_directories() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("docs/dictionaries/registry.json");

        save_registry(&sample_registry(), &path)?;
        assert!(path.is_file());
        Ok(())
    }

    #[test]
    fn test_save_leaves_no_temporary_file_behind() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("registry.json");

        save_registry(&sample_registry(), &path)?;
        let names: Vec<String> = fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["registry.json"]);
        Ok(())
    }

    #[test]
    fn test_csv_round_trip_keeps_columns_but_drops_paths() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("registry.csv");
        let registry = sample_registry();

        save_registry(&registry, &path)?;
        let loaded = load_registry(&path)?;

        let original = registry.get("samples.csv").unwrap();
        let reloaded = loaded.get("samples.csv").unwrap();
        assert_eq!(reloaded.columns, original.columns);
        assert!(reloaded.path.is_empty(), "flattened form carries no paths");
        Ok(())
    }

    #[test]
    fn test_empty_registry_flattens_to_header_only() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("registry.csv");

        save_registry(&Registry::new(), &path)?;
        let contents = fs::read_to_string(&path)?;
        assert_eq!(contents.lines().next(), Some(FLAT_HEADER.join(",").as_str()));
        assert_eq!(contents.lines().count(), 1);
        Ok(())
    }

    #[test]
    fn test_flattened_load_tolerates_reordered_headings() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("registry.csv");
        fs::write(
            &path,
            "Variable Name,Filename,Description\nid,samples.csv,primary key\n",
        )?;

        let loaded = load_registry(&path)?;
        let entry = loaded.get("samples.csv").unwrap();
        let spec = entry.columns.first().unwrap();
        assert_eq!(spec.variable_name, "id");
        assert_eq!(spec.description, "primary key");
        assert!(spec.data_type.is_empty(), "absent headings load as empty");
        Ok(())
    }

    #[test]
    fn test_load_rejects_duplicate_column_declarations() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("registry.json");
        fs::write(
            &path,
            r#"{"a.csv": {"path": "a.csv", "columns": [
                {"Variable Name": "id"}, {"Variable Name": "id"}
            ]}}"#,
        )?;

        assert!(load_registry(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let registry = Registry::new();
        let err = save_registry(&registry, Path::new("registry.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported registry format"), "got: {err}");
        assert!(load_registry(Path::new("registry.yaml")).is_err());
    }
}
