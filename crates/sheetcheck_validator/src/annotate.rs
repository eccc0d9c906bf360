//! Cell annotation and the annotated-copy writer.
//!
//! The annotator turns violations into per-cell marks (a highlight plus an
//! explanatory note). Marks are applied while the row sweep runs, one mark
//! per violation; persisting them produces a copy of the table with the
//! offending cells filled red and commented.

use crate::{CellValue, CheckError, Table};
use rust_xlsxwriter::{Color, Format, Note, Workbook};
use sheetcheck_core::Violation;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Fill color for marked cells.
pub const HIGHLIGHT_COLOR: u32 = 0xFF9797;

/// Author name attached to annotation notes.
const NOTE_AUTHOR: &str = "sheetcheck";

/// Collects per-cell marks during a validation run.
///
/// Keys are 0-based sheet coordinates; a cell marked twice keeps the last
/// mark. An annotator is only handed to the table validator when the caller
/// asked for an annotated copy — a run without one mutates nothing.
#[derive(Debug, Default)]
pub struct Annotator {
    marks: BTreeMap<(u32, u16), String>,
}

impl Annotator {
    /// Creates an empty annotator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the cell at (`row`, `col`) for `violation`.
    ///
    /// `row` is the sheet's 1-based row number as carried by the violation;
    /// `col` is the 0-based sheet column. A row of 0 cannot name a cell and
    /// is ignored.
    pub fn mark(&mut self, row: u32, col: u16, violation: &Violation) {
        let Some(row0) = row.checked_sub(1) else {
            return;
        };
        self.marks.insert((row0, col), comment_text(violation));
    }

    /// Number of marked cells.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns true if no cell has been marked.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// The note text recorded for the cell at 1-based `row` and 0-based
    /// `col`, if any.
    pub fn note_at(&self, row: u32, col: u16) -> Option<&str> {
        row.checked_sub(1)
            .and_then(|row0| self.marks.get(&(row0, col)))
            .map(String::as_str)
    }

    fn get(&self, row0: u32, col: u16) -> Option<&str> {
        self.marks.get(&(row0, col)).map(String::as_str)
    }
}

/// Human-readable explanation attached to a marked cell.
fn comment_text(violation: &Violation) -> String {
    match violation {
        Violation::NonEmpty { .. } => "Cell must not be empty.".to_string(),
        Violation::Type {
            expected, actual, ..
        } => format!(
            "Cell is of type '{}', but should have been '{}'.",
            actual, expected
        ),
        Violation::Regex { pattern, .. } => format!(
            "Cell does not match the specified regular expression '{}'.",
            pattern
        ),
    }
}

/// Writes a copy of `table` to `path` with the annotator's marks applied.
///
/// Every cell is re-emitted at its original sheet coordinates; marked cells
/// get a solid highlight fill and a note. Refuses to write to the table's own
/// source path.
pub fn save_annotated(table: &Table, annotator: &Annotator, path: &Path) -> Result<(), CheckError> {
    if !table.path().as_os_str().is_empty() && path == table.path() {
        return Err(CheckError::OutputIsInput(path.to_path_buf()));
    }

    let highlight = Format::new().set_background_color(Color::RGB(HIGHLIGHT_COLOR));
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let date_highlight = date_format
        .clone()
        .set_background_color(Color::RGB(HIGHLIGHT_COLOR));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name())?;

    for (offset, cell) in table.header().iter().enumerate() {
        let col = table.start_col() + offset as u16;
        write_cell(worksheet, table.start_row(), col, cell, None, &date_format)?;
    }

    for (index, cells) in table.rows().iter().enumerate() {
        let row = table.start_row() + index as u32 + 1;
        for (offset, cell) in cells.iter().enumerate() {
            let col = table.start_col() + offset as u16;
            let mark = annotator.get(row, col);
            let format = match (mark.is_some(), cell) {
                (true, CellValue::DateTime(_)) => Some(&date_highlight),
                (true, _) => Some(&highlight),
                (false, CellValue::DateTime(_)) => Some(&date_format),
                (false, _) => None,
            };
            write_cell(worksheet, row, col, cell, format, &date_format)?;

            if let Some(text) = mark {
                let note = Note::new(text).set_author(NOTE_AUTHOR);
                worksheet.insert_note(row, col, &note)?;
            }
        }
    }

    workbook.save(path)?;
    info!(
        path = %path.display(),
        marked = annotator.len(),
        "annotated copy saved"
    );
    Ok(())
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: Option<&Format>,
    date_format: &Format,
) -> Result<(), CheckError> {
    match (cell, format) {
        (CellValue::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellValue::Empty, None) => {}
        (CellValue::Text(s), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        (CellValue::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (CellValue::Number(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        (CellValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (CellValue::Bool(b), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        (CellValue::Bool(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (CellValue::DateTime(dt), Some(format)) => {
            worksheet.write_datetime_with_format(row, col, dt, format)?;
        }
        (CellValue::DateTime(dt), None) => {
            worksheet.write_datetime_with_format(row, col, dt, date_format)?;
        }
        // Error values survive only as their display text.
        (CellValue::Error(e), Some(format)) => {
            worksheet.write_string_with_format(row, col, e, format)?;
        }
        (CellValue::Error(e), None) => {
            worksheet.write_string(row, col, e)?;
        }
    }
    Ok(())
}
