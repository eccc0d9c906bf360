//! Per-column summary rendering.
//!
//! For each column the reporter emits a status line (skipped / ok / error)
//! and, per violation kind present, either a collapsed sentence (when every
//! counted cell of the column failed that way) or an aligned listing of the
//! offending rows, truncated past a configurable cap.

use crate::Outcome;
use colored::Colorize;
use sheetcheck_core::{ColumnSpec, Schema, Violation, ViolationKind};
use std::collections::BTreeSet;

/// Maximum number of rows in a violation listing before truncation.
pub const OUTPUT_TABLE_MAX: usize = 20;

/// Renders the per-column validation summary.
#[derive(Debug, Clone)]
pub struct Reporter {
    max_rows: usize,
    hide_skipped: bool,
    hide_ok: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Creates a reporter with the default row cap and no display filters.
    pub fn new() -> Self {
        Self {
            max_rows: OUTPUT_TABLE_MAX,
            hide_skipped: false,
            hide_ok: false,
        }
    }

    /// Hides skipped columns from the summary.
    pub fn hide_skipped(mut self, hide: bool) -> Self {
        self.hide_skipped = hide;
        self
    }

    /// Hides columns without violations from the summary.
    pub fn hide_ok(mut self, hide: bool) -> Self {
        self.hide_ok = hide;
        self
    }

    /// Overrides the listing row cap.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Renders the summary for `outcome`, one section per schema column in
    /// schema order.
    pub fn render(&self, schema: &Schema, outcome: &Outcome) -> String {
        let mut out = String::new();

        for col in &schema.cols {
            let violations = outcome.column_violations(&col.name);

            if self.hide_skipped && col.skip {
                continue;
            }
            if self.hide_ok && violations.is_empty() {
                continue;
            }

            out.push_str(&format!("{}\n", format!("> {}", col.name).bold()));

            if col.skip {
                out.push_str(&format!("{}\n\n", skipped_tag()));
                continue;
            }
            if violations.is_empty() {
                out.push_str(&format!("{} : No violations found\n\n", ok_tag()));
                continue;
            }

            out.push_str(&format!(
                "{} : {} violations found\n",
                error_tag(),
                violations.len()
            ));

            for kind in ViolationKind::REPORT_ORDER {
                self.render_kind(&mut out, col, kind, outcome);
            }
        }

        out
    }

    fn render_kind(&self, out: &mut String, col: &ColumnSpec, kind: ViolationKind, outcome: &Outcome) {
        let of_kind = outcome.column_violations_of(&col.name, kind);
        if of_kind.is_empty() {
            return;
        }

        let non_empty = outcome.non_empty_count(&col.name);
        let expected = col
            .column_type
            .map(|t| t.to_string())
            .unwrap_or_default();

        if of_kind.len() == non_empty {
            let sentence = match kind {
                ViolationKind::Type => {
                    let actual_types: BTreeSet<&str> =
                        of_kind.iter().filter_map(|v| actual_kind_name(v)).collect();
                    format!(
                        "All cells did not match the expected type '{}'. Instead, the following type(s) were found: [{}]",
                        expected,
                        actual_types.into_iter().collect::<Vec<_>>().join(",")
                    )
                }
                ViolationKind::Regex => "All cells did not match the regular expression.".to_string(),
                ViolationKind::NonEmpty => {
                    "All cells are empty, even though non-null is set to true".to_string()
                }
            };
            push_indented(out, &sentence, 2);
        } else {
            let (headline, headers) = match kind {
                ViolationKind::Type => (
                    format!("The following cells did not match the expected type ({expected}) :"),
                    vec!["Row", "Value", "Type"],
                ),
                ViolationKind::Regex => (
                    "The following cells did not match the regular expression:".to_string(),
                    vec!["Row", "Value"],
                ),
                ViolationKind::NonEmpty => (
                    "The following cells are empty, even though non-null is set to true:".to_string(),
                    vec!["Row"],
                ),
            };
            push_indented(out, &headline, 2);
            out.push('\n');

            let rows: Vec<Vec<String>> = of_kind
                .iter()
                .take(self.max_rows)
                .map(|v| listing_row(v, kind))
                .collect();
            push_indented(out, &format_table(&headers, &rows), 4);

            if of_kind.len() > self.max_rows {
                push_indented(
                    out,
                    &format!(".. and {} more!", of_kind.len() - self.max_rows),
                    4,
                );
            }
        }

        out.push('\n');
    }
}

fn listing_row(violation: &Violation, kind: ViolationKind) -> Vec<String> {
    let row = violation.row().to_string();
    match kind {
        ViolationKind::Type => vec![
            row,
            format!("'{}'", violation.value()),
            actual_kind_name(violation).unwrap_or_default().to_string(),
        ],
        ViolationKind::Regex => vec![row, format!("'{}'", violation.value())],
        ViolationKind::NonEmpty => vec![row],
    }
}

fn actual_kind_name(violation: &Violation) -> Option<&'static str> {
    match violation {
        Violation::Type { actual, .. } => Some(actual.as_str()),
        _ => None,
    }
}

/// Appends `text` line by line, each line prefixed with `indent` spaces.
fn push_indented(out: &mut String, text: &str, indent: usize) {
    let pad = " ".repeat(indent);
    for line in text.lines() {
        out.push_str(&pad);
        out.push_str(line);
        out.push('\n');
    }
}

/// Renders an aligned, two-space-separated text table with a dashed rule
/// under the header.
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        let line = cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

fn ok_tag() -> String {
    format!("[{}]", "OK".green())
}

fn error_tag() -> String {
    format!("[{}]", "ERROR".red())
}

fn skipped_tag() -> String {
    format!("[{}]", "SKIPPED".yellow())
}
