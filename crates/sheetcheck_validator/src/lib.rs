//! # sheetcheck validator
//!
//! Validation engine for .xlsx tables. This crate checks a loaded table
//! against a column schema, cell by cell:
//!
//! - Emptiness (non-null columns must have a value)
//! - Type conformance (native cell type vs declared column type)
//! - Pattern conformance (string columns with a regex)
//!
//! and renders a per-column summary of the findings. An optional annotator
//! produces a copy of the table with violating cells highlighted and
//! commented.
//!
//! ## Example
//!
//! ```rust
//! use sheetcheck_core::{ColumnSpec, ColumnType, MissingTypePolicy, Schema};
//! use sheetcheck_validator::{CellValue, Reporter, Table, TableValidator};
//!
//! let schema = Schema::from_cols(
//!     vec![ColumnSpec::new("Name", ColumnType::String)],
//!     MissingTypePolicy::Strict,
//! )
//! .unwrap();
//!
//! let table = Table::from_cells(
//!     "Sheet1",
//!     vec![
//!         vec![CellValue::Text("Name".into())],
//!         vec![CellValue::Number(7.0)],
//!     ],
//! );
//!
//! let validator = TableValidator::new(schema).unwrap();
//! let outcome = validator.validate(&table).unwrap();
//! assert_eq!(outcome.total_violations(), 1);
//!
//! let summary = Reporter::new().render(validator.schema(), &outcome);
//! assert!(summary.contains("> Name"));
//! ```

mod annotate;
mod engine;
mod error;
mod report;
mod row;
mod table;

pub use annotate::*;
pub use engine::*;
pub use error::*;
pub use report::*;
pub use row::*;
pub use table::*;
