//! Table-level validation driver.
//!
//! The table validator verifies the header row against the schema, then
//! sweeps all data rows through the row validator, accumulating violations
//! and non-empty counts per column. When an annotator is supplied, every
//! violation is handed to it the moment it is produced.

use crate::{Annotator, CheckError, RowValidator, Table};
use sheetcheck_core::{Schema, Violation, ViolationKind};
use std::collections::HashMap;
use tracing::debug;

/// Accumulated result of one validation run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Number of data rows swept
    pub rows_checked: usize,
    /// Per column, how many cells were non-empty
    pub non_empty: HashMap<String, usize>,
    /// Per column, the violations found, in row order
    pub violations: HashMap<String, Vec<Violation>>,
}

impl Outcome {
    fn for_schema(schema: &Schema) -> Self {
        let non_empty = schema
            .column_names()
            .map(|name| (name.to_string(), 0))
            .collect();
        let violations = schema
            .column_names()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        Self {
            rows_checked: 0,
            non_empty,
            violations,
        }
    }

    /// Violations recorded for `column`.
    pub fn column_violations(&self, column: &str) -> &[Violation] {
        self.violations.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty cell count recorded for `column`.
    pub fn non_empty_count(&self, column: &str) -> usize {
        self.non_empty.get(column).copied().unwrap_or(0)
    }

    /// Violations of one kind for `column`, in row order.
    pub fn column_violations_of(&self, column: &str, kind: ViolationKind) -> Vec<&Violation> {
        self.column_violations(column)
            .iter()
            .filter(|v| v.kind() == kind)
            .collect()
    }

    /// Total violation count across all columns.
    pub fn total_violations(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }

    /// Returns true if the run found no violations at all.
    pub fn is_clean(&self) -> bool {
        self.total_violations() == 0
    }
}

/// Drives a full validation run over one table.
pub struct TableValidator {
    schema: Schema,
    rows: RowValidator,
}

impl TableValidator {
    /// Builds a validator for `schema`, compiling its patterns.
    pub fn new(schema: Schema) -> Result<Self, CheckError> {
        let rows = RowValidator::new(&schema)?;
        Ok(Self { schema, rows })
    }

    /// The schema this validator checks against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates `table`, accumulating violations without annotating.
    pub fn validate(&self, table: &Table) -> Result<Outcome, CheckError> {
        self.run(table, None)
    }

    /// Validates `table`, handing each violation to `annotator` as it is
    /// produced.
    pub fn validate_with_annotator(
        &self,
        table: &Table,
        annotator: &mut Annotator,
    ) -> Result<Outcome, CheckError> {
        self.run(table, Some(annotator))
    }

    fn run(&self, table: &Table, mut annotator: Option<&mut Annotator>) -> Result<Outcome, CheckError> {
        if table.width() == 0 || table.rows().is_empty() {
            return Err(CheckError::EmptySheet);
        }
        self.check_header(table)?;

        let mut outcome = Outcome::for_schema(&self.schema);

        for (index, cells) in table.rows().iter().enumerate() {
            let row_number = table.row_number(index);
            for (col_index, violation) in
                self.rows.validate_row(row_number, cells, &mut outcome.non_empty)
            {
                if let Some(annotator) = annotator.as_deref_mut() {
                    annotator.mark(row_number, table.start_col() + col_index as u16, &violation);
                }
                if let Some(list) = outcome.violations.get_mut(violation.column()) {
                    list.push(violation);
                }
            }
            outcome.rows_checked += 1;
        }

        debug!(
            rows = outcome.rows_checked,
            violations = outcome.total_violations(),
            "row sweep finished"
        );
        Ok(outcome)
    }

    /// Compares the header row positionally against the schema's column
    /// names. The first name mismatch wins; a length mismatch is reported
    /// only after the overlapping prefix checks out.
    fn check_header(&self, table: &Table) -> Result<(), CheckError> {
        for (index, (expected, actual)) in self
            .schema
            .column_names()
            .zip(table.header().iter())
            .enumerate()
        {
            if actual.as_text() != Some(expected) {
                return Err(CheckError::header_name(
                    index + 1,
                    expected,
                    actual.to_string(),
                ));
            }
        }

        if table.width() != self.schema.len() {
            return Err(CheckError::HeaderLength {
                expected: self.schema.len(),
                actual: table.width(),
            });
        }

        Ok(())
    }
}
