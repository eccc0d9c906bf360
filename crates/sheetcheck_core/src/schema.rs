//! Column schema types and loading.
//!
//! A schema is an ordered list of column specifications, loaded from a JSON
//! document with a top-level `cols` array. Column order is significant: it
//! must align positionally with the header row of the table being checked.

use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Declared type of a column.
///
/// Type names are resolved when the schema is loaded; an unrecognized name
/// fails deserialization. A cell satisfies its declared type only with its
/// native value — a numeric-looking string does not count as `number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Native text cell
    String,
    /// Numeric cell, integer or floating point (not boolean)
    Number,
    /// Native date/time cell
    Date,
}

impl ColumnType {
    /// Returns the schema-file name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specification for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, matched against the table's header row
    pub name: String,

    /// Declared type; required unless the column is skipped
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,

    /// Skip this column entirely
    #[serde(default)]
    pub skip: bool,

    /// Disallow empty cells in this column
    #[serde(rename = "non-null", default)]
    pub non_null: bool,

    /// Pattern a text cell must match from its start; only meaningful for
    /// `string` columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl ColumnSpec {
    /// Creates a spec with the given name and type and default flags.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type: Some(column_type),
            skip: false,
            non_null: false,
            regex: None,
        }
    }

    /// Creates a skipped column spec.
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
            skip: true,
            non_null: false,
            regex: None,
        }
    }

    /// Marks the column as non-null.
    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    /// Sets the pattern for a string column.
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }
}

/// How to treat a non-skipped column whose `type` key is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTypePolicy {
    /// Fail schema loading
    Strict,
    /// Log a warning and force `skip = true` for that column
    #[default]
    WarnAndSkip,
}

/// An ordered column schema.
///
/// Name uniqueness is not enforced; callers that index results by column name
/// are expected to provide unique names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Column specifications, in table order
    pub cols: Vec<ColumnSpec>,
}

impl Schema {
    /// Loads a schema from a JSON document.
    ///
    /// Fails if the document is malformed, lacks the `cols` key, or names an
    /// unknown column type. A non-skipped column without a `type` key is
    /// handled according to `policy`.
    pub fn from_json_str(raw: &str, policy: MissingTypePolicy) -> Result<Schema, SchemaError> {
        let mut schema: Schema = serde_json::from_str(raw)?;
        schema.resolve_missing_types(policy)?;
        Ok(schema)
    }

    /// Builds a schema directly from column specs, applying the same
    /// missing-type policy as [`Schema::from_json_str`].
    pub fn from_cols(
        cols: Vec<ColumnSpec>,
        policy: MissingTypePolicy,
    ) -> Result<Schema, SchemaError> {
        let mut schema = Schema { cols };
        schema.resolve_missing_types(policy)?;
        Ok(schema)
    }

    /// Returns the expected header names, in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cols.iter().map(|col| col.name.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    fn resolve_missing_types(&mut self, policy: MissingTypePolicy) -> Result<(), SchemaError> {
        for (index, col) in self.cols.iter_mut().enumerate() {
            if col.skip || col.column_type.is_some() {
                continue;
            }
            match policy {
                MissingTypePolicy::Strict => {
                    return Err(SchemaError::missing_type(index, &col.name));
                }
                MissingTypePolicy::WarnAndSkip => {
                    warn!(
                        column = %col.name,
                        "column has no 'type' key, skipping it"
                    );
                    col.skip = true;
                }
            }
        }
        Ok(())
    }
}
