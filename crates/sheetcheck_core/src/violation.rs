//! The violation model.
//!
//! A `Violation` records one mismatch between a cell and its column spec.
//! Violations are created during row evaluation, accumulated for the run, and
//! consumed by the reporter and the annotator, which both dispatch on the
//! variant tag.

use crate::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Native type of a cell value, as observed in the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Absent/empty cell
    Empty,
    /// Text cell
    Text,
    /// Numeric cell (integer or floating point)
    Number,
    /// Boolean cell
    Bool,
    /// Date/time cell
    DateTime,
    /// Spreadsheet error value (e.g. `#DIV/0!`)
    Error,
}

impl CellKind {
    /// Human-readable name, used in reports and annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Empty => "empty",
            CellKind::Text => "string",
            CellKind::Number => "number",
            CellKind::Bool => "boolean",
            CellKind::DateTime => "date",
            CellKind::Error => "error",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of a violation, used to group report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Cell value does not have the declared type
    Type,
    /// Text cell does not match the column's pattern
    Regex,
    /// Cell is empty but the column is non-null
    NonEmpty,
}

impl ViolationKind {
    /// Fixed order in which violation kinds appear in a column's report.
    pub const REPORT_ORDER: [ViolationKind; 3] =
        [ViolationKind::Type, ViolationKind::Regex, ViolationKind::NonEmpty];
}

/// A single rule violation detected in one cell.
///
/// Every variant carries the offending column name, the 1-based row number as
/// the source table counts rows (header = row 1), and the stringified cell
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// Empty cell in a non-null column
    NonEmpty {
        /// Column name
        column: String,
        /// 1-based source row number
        row: u32,
        /// Stringified cell value (the empty marker, `None`)
        value: String,
    },

    /// Cell value of the wrong native type
    Type {
        /// Column name
        column: String,
        /// 1-based source row number
        row: u32,
        /// Stringified cell value
        value: String,
        /// Type declared in the schema
        expected: ColumnType,
        /// Native type actually found
        actual: CellKind,
    },

    /// Text cell not matching the column's pattern
    Regex {
        /// Column name
        column: String,
        /// 1-based source row number
        row: u32,
        /// Stringified cell value
        value: String,
        /// The pattern that failed to match
        pattern: String,
    },
}

impl Violation {
    /// Creates a non-empty violation.
    pub fn non_empty(column: impl Into<String>, row: u32, value: impl Into<String>) -> Self {
        Self::NonEmpty {
            column: column.into(),
            row,
            value: value.into(),
        }
    }

    /// Creates a type violation.
    pub fn type_mismatch(
        column: impl Into<String>,
        row: u32,
        value: impl Into<String>,
        expected: ColumnType,
        actual: CellKind,
    ) -> Self {
        Self::Type {
            column: column.into(),
            row,
            value: value.into(),
            expected,
            actual,
        }
    }

    /// Creates a regex violation.
    pub fn pattern_mismatch(
        column: impl Into<String>,
        row: u32,
        value: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self::Regex {
            column: column.into(),
            row,
            value: value.into(),
            pattern: pattern.into(),
        }
    }

    /// The violation kind tag.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::NonEmpty { .. } => ViolationKind::NonEmpty,
            Violation::Type { .. } => ViolationKind::Type,
            Violation::Regex { .. } => ViolationKind::Regex,
        }
    }

    /// Name of the offending column.
    pub fn column(&self) -> &str {
        match self {
            Violation::NonEmpty { column, .. }
            | Violation::Type { column, .. }
            | Violation::Regex { column, .. } => column,
        }
    }

    /// 1-based row number of the offending cell, as the source table counts
    /// rows (header = row 1).
    pub fn row(&self) -> u32 {
        match self {
            Violation::NonEmpty { row, .. }
            | Violation::Type { row, .. }
            | Violation::Regex { row, .. } => *row,
        }
    }

    /// Stringified value of the offending cell.
    pub fn value(&self) -> &str {
        match self {
            Violation::NonEmpty { value, .. }
            | Violation::Type { value, .. }
            | Violation::Regex { value, .. } => value,
        }
    }
}
