//! End-to-end checks of the validation pipeline, from in-memory tables
//! through the reporter, covering the collapse and truncation rules and the
//! independence of per-cell findings.

use sheetcheck_core::{ColumnSpec, ColumnType, MissingTypePolicy, Schema, ViolationKind};
use sheetcheck_validator::{CellValue, Reporter, Table, TableValidator};

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn number(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn schema(cols: Vec<ColumnSpec>) -> Schema {
    Schema::from_cols(cols, MissingTypePolicy::Strict).unwrap()
}

#[test]
fn test_mixed_violations_accumulate_per_column() {
    let schema = schema(vec![
        ColumnSpec::new("Name", ColumnType::String).non_null(),
        ColumnSpec::new("Age", ColumnType::Number),
        ColumnSpec::new("Code", ColumnType::String).with_regex("[A-Z]{2}-"),
        ColumnSpec::skipped("Notes"),
    ]);
    let validator = TableValidator::new(schema).unwrap();

    let table = Table::from_cells(
        "Sheet1",
        vec![
            vec![text("Name"), text("Age"), text("Code"), text("Notes")],
            vec![text("alice"), number(31.0), text("AB-1"), text("x")],
            vec![CellValue::Empty, text("oops"), text("zz-1"), number(9.0)],
            vec![text("carol"), number(28.5), CellValue::Empty, CellValue::Empty],
        ],
    );

    let outcome = validator.validate(&table).unwrap();
    assert_eq!(outcome.rows_checked, 3);
    assert_eq!(outcome.total_violations(), 3);

    assert_eq!(outcome.column_violations("Name").len(), 1);
    assert_eq!(
        outcome.column_violations("Name")[0].kind(),
        ViolationKind::NonEmpty
    );

    assert_eq!(outcome.column_violations("Age").len(), 1);
    assert_eq!(
        outcome.column_violations("Age")[0].kind(),
        ViolationKind::Type
    );

    assert_eq!(outcome.column_violations("Code").len(), 1);
    assert_eq!(
        outcome.column_violations("Code")[0].kind(),
        ViolationKind::Regex
    );

    // The skipped column is never evaluated, not even counted.
    assert_eq!(outcome.column_violations("Notes").len(), 0);
    assert_eq!(outcome.non_empty_count("Notes"), 0);

    // Non-empty counts include violating cells.
    assert_eq!(outcome.non_empty_count("Name"), 2);
    assert_eq!(outcome.non_empty_count("Age"), 3);
    assert_eq!(outcome.non_empty_count("Code"), 2);
}

#[test]
fn test_collapse_when_every_counted_cell_fails() {
    colored::control::set_override(false);

    let schema = schema(vec![ColumnSpec::new("Age", ColumnType::Number)]);
    let validator = TableValidator::new(schema).unwrap();

    let table = Table::from_cells(
        "Sheet1",
        vec![
            vec![text("Age")],
            vec![text("one")],
            vec![CellValue::Bool(true)],
        ],
    );

    let outcome = validator.validate(&table).unwrap();
    let summary = Reporter::new().render(validator.schema(), &outcome);

    assert!(
        summary.contains("All cells did not match the expected type 'number'."),
        "got:\n{summary}"
    );
    assert!(
        summary.contains("[boolean,string]"),
        "distinct actual kinds, deduplicated: {summary}"
    );
    assert!(!summary.contains("The following cells"), "got:\n{summary}");
}

#[test]
fn test_report_is_idempotent() {
    colored::control::set_override(false);

    let schema = schema(vec![
        ColumnSpec::new("Name", ColumnType::String).non_null(),
        ColumnSpec::new("Age", ColumnType::Number),
    ]);
    let validator = TableValidator::new(schema).unwrap();
    let table = Table::from_cells(
        "Sheet1",
        vec![
            vec![text("Name"), text("Age")],
            vec![CellValue::Empty, text("x")],
            vec![text("bob"), number(4.0)],
        ],
    );

    let first = Reporter::new().render(validator.schema(), &validator.validate(&table).unwrap());
    let second = Reporter::new().render(validator.schema(), &validator.validate(&table).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_truncated_listing_counts_the_rest() {
    colored::control::set_override(false);

    let schema = schema(vec![
        ColumnSpec::new("Code", ColumnType::String).with_regex("[A-Z]+")
    ]);
    let validator = TableValidator::new(schema).unwrap();

    // 25 bad values and one good one, so the listing form is chosen.
    let mut cells = vec![vec![text("Code")]];
    for _ in 0..25 {
        cells.push(vec![text("bad")]);
    }
    cells.push(vec![text("GOOD")]);
    let table = Table::from_cells("Sheet1", cells);

    let outcome = validator.validate(&table).unwrap();
    assert_eq!(outcome.total_violations(), 25);

    let summary = Reporter::new().render(validator.schema(), &outcome);
    assert!(summary.contains(".. and 5 more!"), "got:\n{summary}");
}

#[test]
fn test_pattern_prefix_semantics_end_to_end() {
    let schema = schema(vec![
        ColumnSpec::new("Email", ColumnType::String).with_regex(r"[^@]+@")
    ]);
    let validator = TableValidator::new(schema).unwrap();

    let table = Table::from_cells(
        "Sheet1",
        vec![
            vec![text("Email")],
            vec![text("a@example.com")],
            vec![text("@example.com")],
        ],
    );

    let outcome = validator.validate(&table).unwrap();
    let violations = outcome.column_violations("Email");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].row(), 3);
    assert_eq!(violations[0].value(), "@example.com");
}
