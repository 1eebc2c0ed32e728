use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Recursively collects every file under `root`, sorted by full path.
///
/// Unreadable directories are skipped with a warning, so a missing root
/// yields an empty list rather than an error.
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files(root, &mut files);
    files.sort();
    files
}

fn collect_files(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Skipping unreadable directory {}: {err}", dir.display());
            return;
        }
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, acc);
        } else if path.is_file() {
            acc.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_files_come_back_sorted_by_path() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("b"))?;
        fs::write(dir.path().join("b/late.csv"), "x\n")?;
        fs::write(dir.path().join("b.csv"), "x\n")?;
        fs::write(dir.path().join("a.csv"), "x\n")?;

        let names: Vec<String> = files_under(dir.path())
            .iter()
            .map(|path| {
                path.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a.csv", "b/late.csv", "b.csv"]);
        Ok(())
    }

    #[test]
    fn test_directories_themselves_are_not_listed() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("empty/nested"))?;

        assert!(files_under(dir.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        assert!(files_under(Path::new("no/such/root")).is_empty());
    }
}
