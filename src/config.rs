//! Project configuration file handling.
//!
//! A project keeps its settings in a JSON file at the project root,
//! [`CONFIG_FILE`] by default. Missing fields fall back to defaults and
//! unknown fields are ignored, so configs written by older versions keep
//! loading.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

/// Default project configuration file name.
pub const CONFIG_FILE: &str = ".project_config.json";

/// Per-project settings consumed by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Human-readable project name.
    pub project_name: String,
    /// Directory under the project root holding tracked data files.
    pub data_directory_name: String,
    /// Where the registry snapshot lives, relative to the project root.
    pub dictionary_path: String,
    /// Convention data file basenames must match.
    pub data_naming_convention_regex: String,
    /// Extensions data files are expected to carry. Informational for now;
    /// the naming check covers every file.
    pub allowed_file_extensions: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_name: "My Research Data Project".to_owned(),
            data_directory_name: "data".to_owned(),
            dictionary_path: "docs/data_dictionaries/data_dictionary.json".to_owned(),
            data_naming_convention_regex:
                r"^P[0-9]{2}_Exp[A-Z]_[0-9]{4}-[0-9]{2}-[0-9]{2}\.(csv|json)$".to_owned(),
            allowed_file_extensions: vec!["csv".to_owned(), "json".to_owned()],
        }
    }
}

impl ProjectConfig {
    /// Load the configuration at `path`, or defaults when no file exists
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing file cannot be read or parsed. A
    /// broken config is reported rather than silently replaced with
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project config {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse project config {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration to `path` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize project config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write project config {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);

        let config = ProjectConfig {
            project_name: "Sensor Study".to_owned(),
            data_directory_name: "measurements".to_owned(),
            ..ProjectConfig::default()
        };
        config.save(&path)?;

        let loaded = ProjectConfig::load(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_load_of_missing_file_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = ProjectConfig::load(&dir.path().join(CONFIG_FILE))?;
        assert_eq!(config, ProjectConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_configs_fill_in_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"data_directory_name": "raw"}"#)?;

        let config = ProjectConfig::load(&path)?;
        assert_eq!(config.data_directory_name, "raw");
        assert_eq!(config.dictionary_path, ProjectConfig::default().dictionary_path);
        Ok(())
    }

    #[test]
    fn test_unknown_fields_are_ignored() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"project_name": "X", "later_addition": true}"#)?;

        let config = ProjectConfig::load(&path)?;
        assert_eq!(config.project_name, "X");
        Ok(())
    }

    #[test]
    fn test_broken_config_is_an_error_not_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{not json")?;

        assert!(ProjectConfig::load(&path).is_err());
        Ok(())
    }
}
