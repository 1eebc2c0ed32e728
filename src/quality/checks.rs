//! Column rule evaluation over raw string values.
//!
//! Values arrive as `Option<&str>`: `None` for a field absent from a short
//! record, `Some("")` for a present-but-empty field. Type, range, and set
//! rules skip values that count as missing; uniqueness and not-null rules
//! look at every row.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::report::ColumnIssue;
use crate::dictionary::ColumnSpec;

/// Spellings accepted by the `boolean` declared type, compared
/// case-insensitively.
const BOOLEAN_VALUES: [&str; 6] = ["true", "false", "0", "1", "yes", "no"];

/// `<number>-<number>` with optional signs and fractions, e.g. `0-10`,
/// `-0.5-99.9`.
static NUMERIC_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*-\s*([+-]?\d+(?:\.\d+)?)\s*$")
        .expect("range pattern is valid")
});

/// Parse an allowed-values field of the form `<number>-<number>`.
///
/// Returns `None` when the field is anything else, in which case it is read
/// as a comma-separated set instead.
pub fn numeric_range(field: &str) -> Option<(f64, f64)> {
    let captures = NUMERIC_RANGE.captures(field)?;
    let min = captures.get(1)?.as_str().parse().ok()?;
    let max = captures.get(2)?.as_str().parse().ok()?;
    Some((min, max))
}

/// Split an allowed-values field into its set of literal values.
///
/// Members are trimmed and empty members dropped, so `"A, B,"` allows
/// exactly `A` and `B`.
pub fn allowed_set(field: &str) -> Vec<&str> {
    field.split(',').map(str::trim).filter(|member| !member.is_empty()).collect()
}

/// Append every rule violation for one declared column to `issues`.
///
/// `values` holds the column's raw values in row order, one slot per data
/// row.
pub fn check_column(spec: &ColumnSpec, values: &[Option<&str>], issues: &mut Vec<ColumnIssue>) {
    check_type(spec, values, issues);
    check_allowed(spec, values, issues);
    check_unique(spec, values, issues);
    check_not_null(spec, values, issues);
}

/// True when a raw value counts as "no value" for a column with the given
/// missing-value sentinel.
fn is_missing(value: Option<&str>, missing_repr: &str) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty() || v == missing_repr,
    }
}

/// Values subject to the type, range, and set rules: present and not the
/// missing-value sentinel.
fn checked_values<'a>(
    values: &'a [Option<&'a str>],
    missing_repr: &'a str,
) -> impl Iterator<Item = &'a str> {
    values.iter().filter_map(move |value| match value {
        Some(v) if !v.is_empty() && *v != missing_repr => Some(*v),
        _ => None,
    })
}

fn check_type(spec: &ColumnSpec, values: &[Option<&str>], issues: &mut Vec<ColumnIssue>) {
    let conforms: fn(&str) -> bool = match spec.data_type.to_lowercase().as_str() {
        "integer" => |v| v.parse::<i64>().is_ok(),
        "float" | "decimal" => |v| v.parse::<f64>().is_ok(),
        "boolean" => |v| {
            let lower = v.to_lowercase();
            BOOLEAN_VALUES.contains(&lower.as_str())
        },
        "date" => |v| NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok(),
        _ => return,
    };

    let failures: Vec<String> = checked_values(values, &spec.missing_value)
        .filter(|v| !conforms(v))
        .map(str::to_owned)
        .collect();
    if !failures.is_empty() {
        issues.push(ColumnIssue::TypeErrors(failures));
    }
}

fn check_allowed(spec: &ColumnSpec, values: &[Option<&str>], issues: &mut Vec<ColumnIssue>) {
    let allowed = spec.allowed_values.as_str();
    if allowed.is_empty() || allowed.eq_ignore_ascii_case("nan") {
        return;
    }

    let numeric = matches!(
        spec.data_type.to_lowercase().as_str(),
        "integer" | "float" | "decimal"
    );
    if numeric && let Some((min, max)) = numeric_range(allowed) {
        for v in checked_values(values, &spec.missing_value) {
            // Values that do not parse are the type rule's problem.
            let Ok(number) = v.parse::<f64>() else { continue };
            if number < min || number > max {
                issues.push(ColumnIssue::OutOfRange(v.to_owned()));
            }
        }
        return;
    }

    let members = allowed_set(allowed);
    if members.is_empty() {
        return;
    }
    for v in checked_values(values, &spec.missing_value) {
        if !members.contains(&v) {
            issues.push(ColumnIssue::InvalidValue(v.to_owned()));
        }
    }
}

fn check_unique(spec: &ColumnSpec, values: &[Option<&str>], issues: &mut Vec<ColumnIssue>) {
    if !spec.constraints.to_lowercase().contains("unique") {
        return;
    }

    // Uniqueness covers every row; an absent field and an empty field are
    // the same value here.
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for value in values {
        let v = value.unwrap_or_default();
        if !seen.insert(v) {
            duplicates.insert(v.to_owned());
        }
    }
    if !duplicates.is_empty() {
        issues.push(ColumnIssue::DuplicateValues(duplicates.into_iter().collect()));
    }
}

fn check_not_null(spec: &ColumnSpec, values: &[Option<&str>], issues: &mut Vec<ColumnIssue>) {
    let constraints = spec.constraints.to_lowercase();
    if !constraints.contains("not null") && !constraints.contains("cannot be null") {
        return;
    }

    let rows: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| is_missing(**value, &spec.missing_value))
        .map(|(index, _)| index)
        .collect();
    if !rows.is_empty() {
        issues.push(ColumnIssue::NullValues(rows));
    }
}
