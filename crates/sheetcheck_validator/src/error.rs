//! Error types for validation runs.
//!
//! These cover the fatal, run-aborting conditions: structural mismatches
//! between table and schema, unreadable workbooks, invalid patterns, and
//! failures to persist the annotated copy. Per-cell findings are never errors;
//! they accumulate as [`Violation`](sheetcheck_core::Violation)s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a validation run.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The schema document could not be loaded
    #[error("Invalid structure file: {0}")]
    Schema(#[from] sheetcheck_core::SchemaError),

    /// The workbook could not be opened or the sheet does not exist
    #[error("Could not open table file: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// The worksheet has no data rows or no columns
    #[error("Worksheet is empty")]
    EmptySheet,

    /// A header cell does not carry the expected column name
    #[error("Expected column name '{expected}' at column {position}, got '{actual}' instead")]
    HeaderName {
        /// 1-based column position of the first mismatch
        position: usize,
        /// Name declared in the schema
        expected: String,
        /// Value found in the header row
        actual: String,
    },

    /// Header row and schema disagree on the number of columns
    #[error("Expected {expected} column(s), got {actual} instead")]
    HeaderLength {
        /// Number of columns in the schema
        expected: usize,
        /// Number of cells in the header row
        actual: usize,
    },

    /// A column's regex pattern failed to compile
    #[error("Invalid regular expression for column '{column}': {source}")]
    Pattern {
        /// Column the pattern belongs to
        column: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// The annotated copy would overwrite the input table
    #[error("Refusing to overwrite the input table '{}'", .0.display())]
    OutputIsInput(PathBuf),

    /// The annotated copy could not be written
    #[error("Could not save annotated copy: {0}")]
    Save(#[from] rust_xlsxwriter::XlsxError),
}

impl CheckError {
    /// Creates a header-name mismatch error. `position` is 1-based.
    pub fn header_name(
        position: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::HeaderName {
            position,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid-pattern error.
    pub fn pattern(column: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            column: column.into(),
            source,
        }
    }
}
