//! In-memory table representation and workbook loading.
//!
//! A [`Table`] is one worksheet reduced to a header row plus data rows of
//! [`CellValue`]s, anchored at the sheet coordinates where calamine found the
//! first non-empty cell. Row numbers surfaced to the rest of the system are
//! the sheet's own 1-based numbers (header = row 1 for a sheet starting at
//! A1), never loop counters.

use crate::CheckError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use sheetcheck_core::{CellKind, ColumnType};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single cell value, native to the source format.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent/empty cell
    Empty,
    /// Text cell
    Text(String),
    /// Numeric cell (integers and floats are not distinguished by xlsx)
    Number(f64),
    /// Boolean cell
    Bool(bool),
    /// Date/time cell
    DateTime(NaiveDateTime),
    /// Spreadsheet error value, e.g. `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// The native kind of this value.
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Empty => CellKind::Empty,
            CellValue::Text(_) => CellKind::Text,
            CellValue::Number(_) => CellKind::Number,
            CellValue::Bool(_) => CellKind::Bool,
            CellValue::DateTime(_) => CellKind::DateTime,
            CellValue::Error(_) => CellKind::Error,
        }
    }

    /// Returns true for an absent cell.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value satisfies the declared column type.
    ///
    /// Only native matches count: a numeric-looking string is not a `number`,
    /// a boolean is not a `number`, a date-formatted string is not a `date`.
    pub fn matches(&self, expected: ColumnType) -> bool {
        match expected {
            ColumnType::String => matches!(self, CellValue::Text(_)),
            ColumnType::Number => matches!(self, CellValue::Number(_)),
            ColumnType::Date => matches!(self, CellValue::DateTime(_)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => f.write_str("None"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(n) => CellValue::Number(*n),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => CellValue::DateTime(naive),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => match parse_iso_datetime(s) {
                Some(naive) => CellValue::DateTime(naive),
                None => CellValue::Text(s.clone()),
            },
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

/// Renders whole numbers without a trailing `.0`, as a spreadsheet would.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One worksheet loaded into memory.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    sheet_name: String,
    /// 0-based sheet coordinates of the header's first cell
    start_row: u32,
    start_col: u16,
    header: Vec<CellValue>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Loads one sheet of an .xlsx workbook.
    ///
    /// `sheet` selects the sheet by name; `None` takes the first sheet.
    pub fn load(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Table, CheckError> {
        let path = path.as_ref();
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or(CheckError::EmptySheet)?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        let mut rows_iter = range.rows();
        let header: Vec<CellValue> = rows_iter
            .next()
            .map(|row| row.iter().map(CellValue::from).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<CellValue>> = rows_iter
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();

        Ok(Table {
            path: path.to_path_buf(),
            sheet_name,
            start_row,
            start_col: start_col as u16,
            header,
            rows,
        })
    }

    /// Builds a table directly from cell values, anchored at A1.
    ///
    /// The first row of `cells` is taken as the header.
    pub fn from_cells(sheet_name: impl Into<String>, mut cells: Vec<Vec<CellValue>>) -> Table {
        let header = if cells.is_empty() {
            Vec::new()
        } else {
            cells.remove(0)
        };
        Table {
            path: PathBuf::new(),
            sheet_name: sheet_name.into(),
            start_row: 0,
            start_col: 0,
            header,
            rows: cells,
        }
    }

    /// Path of the source workbook; empty for in-memory tables.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the loaded sheet.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// 0-based sheet row of the header.
    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// 0-based sheet column of the first header cell.
    pub fn start_col(&self) -> u16 {
        self.start_col
    }

    /// The header row.
    pub fn header(&self) -> &[CellValue] {
        &self.header
    }

    /// The data rows, in sheet order.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of header cells.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// The sheet's own 1-based row number of data row `index`.
    ///
    /// For a table anchored at A1 the header is row 1 and the first data row
    /// is row 2.
    pub fn row_number(&self, index: usize) -> u32 {
        self.start_row + index as u32 + 2
    }
}
