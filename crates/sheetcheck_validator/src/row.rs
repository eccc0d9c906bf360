//! Per-row rule evaluation.
//!
//! The row validator applies the three rules to each cell, in column order:
//! emptiness, type conformance, and (for string columns) pattern conformance.
//! A cell yields at most one violation; cells never affect each other.

use crate::{CellValue, CheckError};
use regex::Regex;
use sheetcheck_core::{ColumnSpec, ColumnType, Schema, Violation};
use std::collections::HashMap;

/// A column spec with its pattern compiled.
#[derive(Debug)]
pub(crate) struct CompiledColumn {
    pub spec: ColumnSpec,
    /// Anchored pattern; only present for non-skipped string columns
    pub pattern: Option<Regex>,
}

impl CompiledColumn {
    fn compile(spec: &ColumnSpec) -> Result<Self, CheckError> {
        let pattern = match (&spec.regex, spec.column_type) {
            (Some(raw), Some(ColumnType::String)) if !spec.skip => {
                // Match-from-start semantics: the pattern constrains the
                // beginning of the value, not the whole of it.
                let anchored = format!("^(?:{raw})");
                Some(Regex::new(&anchored).map_err(|e| CheckError::pattern(&spec.name, e))?)
            }
            _ => None,
        };
        Ok(Self {
            spec: spec.clone(),
            pattern,
        })
    }
}

/// Evaluates single rows against the schema.
#[derive(Debug)]
pub struct RowValidator {
    columns: Vec<CompiledColumn>,
}

impl RowValidator {
    /// Compiles the schema's patterns and builds a row validator.
    ///
    /// An invalid pattern is rejected here, before any row is seen.
    pub fn new(schema: &Schema) -> Result<Self, CheckError> {
        let columns = schema
            .cols
            .iter()
            .map(CompiledColumn::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }

    /// Checks one data row.
    ///
    /// `cells` are zipped positionally with the schema; the schema's length is
    /// authoritative, so trailing extra cells are ignored and missing trailing
    /// cells count as empty. Non-empty cells of non-skipped columns are
    /// tallied into `non_empty` regardless of whether they violate a rule.
    ///
    /// Returns `(column index, violation)` pairs, in column order.
    pub fn validate_row(
        &self,
        row_number: u32,
        cells: &[CellValue],
        non_empty: &mut HashMap<String, usize>,
    ) -> Vec<(usize, Violation)> {
        let mut found = Vec::new();

        for (index, column) in self.columns.iter().enumerate() {
            let spec = &column.spec;
            if spec.skip {
                continue;
            }

            let cell = cells.get(index).unwrap_or(&CellValue::Empty);

            if cell.is_empty() {
                if spec.non_null {
                    found.push((
                        index,
                        Violation::non_empty(&spec.name, row_number, cell.to_string()),
                    ));
                }
                continue;
            }

            // The cell is known non-empty from here on; this count is the
            // denominator for the "all cells failed" report collapse.
            *non_empty.entry(spec.name.clone()).or_insert(0) += 1;

            let Some(expected) = spec.column_type else {
                continue;
            };

            if !cell.matches(expected) {
                found.push((
                    index,
                    Violation::type_mismatch(
                        &spec.name,
                        row_number,
                        cell.to_string(),
                        expected,
                        cell.kind(),
                    ),
                ));
                continue;
            }

            if let (Some(pattern), Some(text)) = (&column.pattern, cell.as_text()) {
                if !pattern.is_match(text) {
                    let raw = spec.regex.as_deref().unwrap_or_default();
                    found.push((
                        index,
                        Violation::pattern_mismatch(&spec.name, row_number, text, raw),
                    ));
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetcheck_core::{CellKind, MissingTypePolicy, ViolationKind};

    fn schema(cols: Vec<ColumnSpec>) -> Schema {
        Schema::from_cols(cols, MissingTypePolicy::Strict).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_empty_nullable_cell_produces_nothing() {
        let validator =
            RowValidator::new(&schema(vec![ColumnSpec::new("Name", ColumnType::String)])).unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(2, &[CellValue::Empty], &mut counts);
        assert!(found.is_empty());
        assert_eq!(counts.get("Name"), None);
    }

    #[test]
    fn test_empty_non_null_cell_violates_once() {
        let validator = RowValidator::new(&schema(vec![
            ColumnSpec::new("Name", ColumnType::String).non_null()
        ]))
        .unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(5, &[CellValue::Empty], &mut counts);
        assert_eq!(found.len(), 1);
        let (index, violation) = &found[0];
        assert_eq!(*index, 0);
        assert_eq!(violation.kind(), ViolationKind::NonEmpty);
        assert_eq!(violation.row(), 5);
        assert_eq!(violation.value(), "None");
        // Empty cells never count as non-empty.
        assert_eq!(counts.get("Name"), None);
    }

    #[test]
    fn test_type_mismatch_skips_pattern_check() {
        let validator = RowValidator::new(&schema(vec![
            ColumnSpec::new("Code", ColumnType::String).with_regex("[A-Z]{3}")
        ]))
        .unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(2, &[CellValue::Number(7.0)], &mut counts);
        assert_eq!(found.len(), 1);
        match &found[0].1 {
            Violation::Type {
                expected, actual, ..
            } => {
                assert_eq!(*expected, ColumnType::String);
                assert_eq!(*actual, CellKind::Number);
            }
            other => panic!("expected a type violation, got {other:?}"),
        }
        assert_eq!(counts.get("Code"), Some(&1));
    }

    #[test]
    fn test_pattern_matches_from_the_start() {
        let validator = RowValidator::new(&schema(vec![
            ColumnSpec::new("Code", ColumnType::String).with_regex("[A-Z]{3}")
        ]))
        .unwrap();
        let mut counts = HashMap::new();

        // Prefix match: trailing garbage after the match is fine.
        let found = validator.validate_row(2, &[text("ABCdef")], &mut counts);
        assert!(found.is_empty());

        // A match later in the string does not count.
        let found = validator.validate_row(3, &[text("xxABC")], &mut counts);
        assert_eq!(found.len(), 1);
        match &found[0].1 {
            Violation::Regex { pattern, value, .. } => {
                assert_eq!(pattern, "[A-Z]{3}");
                assert_eq!(value, "xxABC");
            }
            other => panic!("expected a regex violation, got {other:?}"),
        }
    }

    #[test]
    fn test_skipped_column_is_untouched() {
        let validator = RowValidator::new(&schema(vec![
            ColumnSpec::skipped("Ignored"),
            ColumnSpec::new("Age", ColumnType::Number),
        ]))
        .unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(2, &[text("anything"), CellValue::Number(3.0)], &mut counts);
        assert!(found.is_empty());
        assert_eq!(counts.get("Ignored"), None);
        assert_eq!(counts.get("Age"), Some(&1));
    }

    #[test]
    fn test_missing_trailing_cells_read_as_empty() {
        let validator = RowValidator::new(&schema(vec![
            ColumnSpec::new("Name", ColumnType::String),
            ColumnSpec::new("Age", ColumnType::Number).non_null(),
        ]))
        .unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(2, &[text("alice")], &mut counts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1.kind(), ViolationKind::NonEmpty);
        assert_eq!(found[0].1.column(), "Age");
    }

    #[test]
    fn test_extra_trailing_cells_ignored() {
        let validator =
            RowValidator::new(&schema(vec![ColumnSpec::new("Name", ColumnType::String)])).unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(2, &[text("alice"), CellValue::Number(99.0)], &mut counts);
        assert!(found.is_empty());
    }

    #[test]
    fn test_at_most_one_violation_per_cell() {
        // Empty + non-null on a string column with a pattern: only NonEmpty fires.
        let validator = RowValidator::new(&schema(vec![ColumnSpec::new(
            "Code",
            ColumnType::String,
        )
        .non_null()
        .with_regex("[A-Z]+")]))
        .unwrap();
        let mut counts = HashMap::new();

        let found = validator.validate_row(2, &[CellValue::Empty], &mut counts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1.kind(), ViolationKind::NonEmpty);
    }

    #[test]
    fn test_invalid_pattern_rejected_up_front() {
        let err = RowValidator::new(&schema(vec![
            ColumnSpec::new("Code", ColumnType::String).with_regex("[unclosed")
        ]))
        .unwrap_err();
        assert!(matches!(err, CheckError::Pattern { .. }));
    }

    #[test]
    fn test_date_column_accepts_only_native_dates() {
        let validator = RowValidator::new(&schema(vec![ColumnSpec::new(
            "Birthdate",
            ColumnType::Date,
        )]))
        .unwrap();
        let mut counts = HashMap::new();

        let date = chrono::NaiveDate::from_ymd_opt(1990, 4, 12)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let found = validator.validate_row(2, &[CellValue::DateTime(date)], &mut counts);
        assert!(found.is_empty());

        let found = validator.validate_row(3, &[text("1990-04-12")], &mut counts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1.kind(), ViolationKind::Type);
    }
}
