//! # sheetcheck core
//!
//! Core data structures for the sheetcheck table checker:
//!
//! - The declarative column schema (`Schema`, `ColumnSpec`, `ColumnType`)
//! - The violation model (`Violation`, `ViolationKind`, `CellKind`)
//! - Schema loading errors (`SchemaError`)
//!
//! ## Example
//!
//! ```rust
//! use sheetcheck_core::{MissingTypePolicy, Schema};
//!
//! let raw = r#"{ "cols": [ { "name": "Name", "type": "string" } ] }"#;
//! let schema = Schema::from_json_str(raw, MissingTypePolicy::Strict).unwrap();
//! assert_eq!(schema.cols.len(), 1);
//! ```

mod error;
mod schema;
mod violation;

pub use error::*;
pub use schema::*;
pub use violation::*;
