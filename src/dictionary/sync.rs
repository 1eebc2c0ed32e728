//! Reconciles the registry with the files currently on disk.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};

use super::schema::{ColumnSpec, DictionaryEntry, Registry};
use crate::{tabular, utils};

/// Counters describing what one synchronization run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Files visited under the data root.
    pub files_seen: usize,
    /// Files that had no registry entry before this run.
    pub entries_created: usize,
    /// Columns synthesized because their name was new in a file's header.
    pub columns_added: usize,
    /// Columns removed because their name left a file's header.
    pub columns_dropped: usize,
}

/// Walk `data_root` recursively and reconcile `registry` with every file
/// found there.
///
/// Every file gets an entry keyed by its basename, tabular or not; files
/// whose header cannot be read are tracked with an empty column list.
/// Columns already known keep their curator fields untouched, new columns
/// get an empty spec, and columns that disappeared from a header are
/// dropped. Each entry's `path` is set to where the file was found on this
/// run. The walk is sorted by path, so a fixed directory tree always
/// produces the same registry.
///
/// Nothing is written to disk here; persisting the result is the caller's
/// job.
pub fn synchronize(data_root: &Path, registry: &mut Registry) -> SyncSummary {
    let mut summary = SyncSummary::default();

    for path in utils::files_under(data_root) {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy().into_owned();

        summary.files_seen += 1;
        let header = tabular::read_header(&path);

        let prior = registry.get(&file_name);
        if prior.is_none() {
            summary.entries_created += 1;
        }
        let columns = merge_columns(
            prior.map(|entry| entry.columns.as_slice()).unwrap_or_default(),
            &header,
            &mut summary,
        );

        debug!("Synchronized {} ({} columns)", path.display(), columns.len());
        registry.insert(
            file_name,
            DictionaryEntry {
                path: path.to_string_lossy().into_owned(),
                columns,
            },
        );
    }

    summary
}

/// Build one file's new column list from its prior specs and the header just
/// read. Known names carry their spec forward unchanged, new names get an
/// empty spec, and a name repeated in the header keeps its first occurrence
/// only.
fn merge_columns(
    prior: &[ColumnSpec],
    header: &[String],
    summary: &mut SyncSummary,
) -> Vec<ColumnSpec> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(header.len());
    for name in header {
        if !seen.insert(name.as_str()) {
            warn!("Duplicate column name '{name}' in header, keeping the first occurrence");
            continue;
        }
        match prior.iter().find(|spec| spec.variable_name == *name) {
            Some(spec) => columns.push(spec.clone()),
            None => {
                summary.columns_added += 1;
                columns.push(ColumnSpec::named(name.clone()));
            }
        }
    }
    summary.columns_dropped += prior
        .iter()
        .filter(|spec| !seen.contains(spec.variable_name.as_str()))
        .count();
    columns
}
