//! Round-trip tests for annotation: write a workbook, load it, validate with
//! an annotator, persist the annotated copy, and read the copy back.

use rust_xlsxwriter::Workbook;
use sheetcheck_core::{ColumnSpec, ColumnType, MissingTypePolicy, Schema};
use sheetcheck_validator::{save_annotated, Annotator, CellValue, CheckError, Table, TableValidator};
use std::path::Path;

fn write_fixture(path: &Path) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Name").unwrap();
    worksheet.write_string(0, 1, "Age").unwrap();
    worksheet.write_string(1, 0, "alice").unwrap();
    worksheet.write_number(1, 1, 30.0).unwrap();
    worksheet.write_string(2, 0, "bob").unwrap();
    worksheet.write_string(2, 1, "oops").unwrap();
    workbook.save(path).unwrap();
}

fn fixture_schema() -> Schema {
    Schema::from_cols(
        vec![
            ColumnSpec::new("Name", ColumnType::String).non_null(),
            ColumnSpec::new("Age", ColumnType::Number),
        ],
        MissingTypePolicy::Strict,
    )
    .unwrap()
}

#[test]
fn test_annotated_copy_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    let output = dir.path().join("annotated.xlsx");
    write_fixture(&input);

    let table = Table::load(&input, None).unwrap();
    assert_eq!(table.sheet_name(), "Sheet1");
    assert_eq!(table.rows().len(), 2);

    let validator = TableValidator::new(fixture_schema()).unwrap();
    let mut annotator = Annotator::new();
    let outcome = validator
        .validate_with_annotator(&table, &mut annotator)
        .unwrap();

    // Row 3 "oops" in the Age column (0-based column 1) is the only problem.
    assert_eq!(outcome.total_violations(), 1);
    assert_eq!(annotator.len(), 1);
    assert_eq!(
        annotator.note_at(3, 1),
        Some("Cell is of type 'string', but should have been 'number'.")
    );
    assert_eq!(annotator.note_at(2, 1), None);
    assert_eq!(annotator.note_at(3, 0), None);

    save_annotated(&table, &annotator, &output).unwrap();

    // The copy carries the same values and still validates identically.
    let copy = Table::load(&output, None).unwrap();
    assert_eq!(copy.header(), table.header());
    assert_eq!(copy.rows().len(), table.rows().len());
    assert_eq!(copy.rows()[0][0], CellValue::Text("alice".into()));
    assert_eq!(copy.rows()[1][1], CellValue::Text("oops".into()));

    let again = validator.validate(&copy).unwrap();
    assert_eq!(again.total_violations(), 1);
}

#[test]
fn test_refuses_to_overwrite_the_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    write_fixture(&input);

    let table = Table::load(&input, None).unwrap();
    let err = save_annotated(&table, &Annotator::new(), &input).unwrap_err();
    assert!(matches!(err, CheckError::OutputIsInput(_)));
    // The input file is untouched.
    assert!(Table::load(&input, None).is_ok());
}

#[test]
fn test_missing_sheet_is_a_workbook_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    write_fixture(&input);

    let err = Table::load(&input, Some("NoSuchSheet")).unwrap_err();
    assert!(matches!(err, CheckError::Workbook(_)));
}
