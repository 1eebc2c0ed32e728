//! File naming convention compliance.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use regex::Regex;

use crate::utils;

/// Files under `data_root` whose basenames do not match `pattern`.
///
/// The pattern must match at the start of the basename; anchor it with `$`
/// to require a full match. Every file is checked regardless of extension,
/// and the walk is sorted so the result order is stable.
///
/// # Errors
///
/// Returns an error when `pattern` is not a valid regular expression.
pub fn non_compliant_files(data_root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let convention = Regex::new(pattern)
        .with_context(|| format!("Invalid naming convention pattern '{pattern}'"))?;

    let mut non_compliant = Vec::new();
    for path in utils::files_under(data_root) {
        let Some(name) = path.file_name() else {
            continue;
        };
        if !matches_at_start(&convention, &name.to_string_lossy()) {
            non_compliant.push(path);
        }
    }
    Ok(non_compliant)
}

/// True when the convention matches beginning at the first byte of `name`.
fn matches_at_start(convention: &Regex, name: &str) -> bool {
    convention.find(name).is_some_and(|found| found.start() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_convention_accepts_well_formed_names() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("P01_ExpA_2024-01-15.csv"), "id\n1\n")?;

        let pattern = ProjectConfig::default().data_naming_convention_regex;
        let bad = non_compliant_files(dir.path(), &pattern)?;
        assert!(bad.is_empty(), "got {bad:?}");
        Ok(())
    }

    #[test]
    fn test_default_convention_flags_everything_else() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("P01_ExpA_2024-01-15.csv"), "id\n1\n")?;
        fs::write(dir.path().join("final_data_v2.csv"), "id\n1\n")?;
        fs::write(dir.path().join("P1_ExpA_2024-01-15.csv"), "id\n1\n")?;

        let pattern = ProjectConfig::default().data_naming_convention_regex;
        let bad = non_compliant_files(dir.path(), &pattern)?;
        let names: Vec<String> = bad
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["P1_ExpA_2024-01-15.csv", "final_data_v2.csv"]);
        Ok(())
    }

    #[test]
    fn test_unanchored_patterns_match_at_the_start_only() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("data_2024.csv"), "id\n1\n")?;
        fs::write(dir.path().join("old_data.csv"), "id\n1\n")?;

        let bad = non_compliant_files(dir.path(), "data")?;
        assert_eq!(bad.len(), 1);
        assert!(bad.first().unwrap().ends_with("old_data.csv"));
        Ok(())
    }

    #[test]
    fn test_nested_files_are_checked() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("raw"))?;
        fs::write(dir.path().join("raw/bad name.csv"), "id\n1\n")?;

        let pattern = ProjectConfig::default().data_naming_convention_regex;
        let bad = non_compliant_files(dir.path(), &pattern)?;
        assert_eq!(bad.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = tempdir().unwrap();
        let err = non_compliant_files(dir.path(), "[unclosed").unwrap_err();
        assert!(err.to_string().contains("Invalid naming convention"), "got: {err}");
    }
}
