//! Data quality validation of tracked files against the registry.
//!
//! The validator resolves each registry entry to a file on disk, compares
//! the file's header with the declared columns, and evaluates every declared
//! rule over the raw values. Findings come back as a [`Report`]; an empty
//! report means the project passed.

pub mod checks;
pub mod report;
pub mod validator;

pub use report::{ColumnIssue, FileIssue, FileReport, Report, UNDECLARED_FILE_ERROR};
pub use validator::validate;
