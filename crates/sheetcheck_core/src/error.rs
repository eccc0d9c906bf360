//! Error types for schema loading.

use thiserror::Error;

/// Errors that can occur while loading or validating a column schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The structure document is not valid JSON, lacks the top-level `cols`
    /// key, or names an unrecognized column type.
    #[error("Invalid structure file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A non-skipped column has no `type` key (strict policy only).
    #[error("Key 'type' is required for all unskipped columns, but was not found for column #{index} ('{name}')")]
    MissingType {
        /// Zero-based position of the column in the schema
        index: usize,
        /// Column name
        name: String,
    },
}

impl SchemaError {
    /// Creates a missing-type error for the column at `index`.
    pub fn missing_type(index: usize, name: impl Into<String>) -> Self {
        Self::MissingType {
            index,
            name: name.into(),
        }
    }
}
