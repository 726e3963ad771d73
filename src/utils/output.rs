use colored::*;
use std::io::{self, Write};

use crate::core::data::{Record, TableKind, UpdateOutcome};
use crate::utils::format::{format_optional, pad_cell};

pub struct OutputStyle;

impl OutputStyle {
    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }
}

fn headers(table: TableKind) -> Vec<&'static str> {
    match table {
        TableKind::Products => vec!["ID", "Name", "Price", "Stock", "Code"],
        TableKind::Books => vec!["ID", "Title", "ISBN"],
    }
}

fn cells(table: TableKind, record: &Record) -> Vec<String> {
    let mut row = vec![record.id.to_string(), record.name.clone()];
    if table.has_inventory() {
        row.push(format_optional(record.price));
        row.push(format_optional(record.stock_quantity));
    }
    row.push(record.code.to_string());
    row
}

/// Print records as a boxed table. Widths are computed on the plain text
/// before any colour is applied.
pub fn write_records<W: Write>(out: &mut W, table: TableKind, records: &[Record]) -> io::Result<()> {
    let headers = headers(table);
    let rows: Vec<Vec<String>> = records.iter().map(|r| cells(table, r)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, parts.join(mid), right)
    };

    writeln!(out, "{}", rule("┌", "┬", "┐"))?;
    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!(" {} ", OutputStyle::header(&pad_cell(h, *w))))
        .collect();
    writeln!(out, "│{}│", header_cells.join("│"))?;
    writeln!(out, "{}", rule("├", "┼", "┤"))?;
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {} ", pad_cell(cell, *w)))
            .collect();
        writeln!(out, "│{}│", line.join("│"))?;
    }
    writeln!(out, "{}", rule("└", "┴", "┘"))
}

pub fn write_row_count<W: Write>(out: &mut W, count: usize) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        OutputStyle::label("Total:"),
        OutputStyle::info(&format!("{} row(s)", count))
    )
}

/// One-line summary of a single record, shown before it is edited
pub fn write_record_summary<W: Write>(out: &mut W, table: TableKind, record: &Record) -> io::Result<()> {
    writeln!(out, "{}", OutputStyle::title(&format!("Current {}", table.record_label())))?;
    let mut fields = vec![format!("{}: {}", table.name_label(), record.name)];
    if table.has_inventory() {
        fields.push(format!("price: {}", format_optional(record.price)));
        fields.push(format!("stock quantity: {}", format_optional(record.stock_quantity)));
    }
    fields.push(format!("{}: {}", table.key_label(), record.code));
    writeln!(out, "  ID {} | {}", record.id, fields.join(", "))
}

pub fn write_json<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(io::Error::other)?;
    writeln!(out, "{}", json)
}

pub fn describe_update(table: TableKind, id: i64, outcome: UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Updated(count) => format!("Updated {} row(s)", count),
        UpdateOutcome::NotFound => format!("No {} with ID {}", table.record_label(), id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::BusinessKey;

    fn sample() -> Vec<Record> {
        vec![
            Record {
                id: 1,
                name: "ballpen".to_string(),
                price: Some(1500),
                stock_quantity: None,
                code: BusinessKey::Numeric(1001),
            },
            Record {
                id: 12,
                name: "pencil case".to_string(),
                price: Some(4500),
                stock_quantity: Some(2),
                code: BusinessKey::Numeric(1002),
            },
        ]
    }

    #[test]
    fn test_table_columns_are_aligned() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_records(&mut out, TableKind::Products, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
        assert!(lines[1].contains("Name       "));
        assert!(lines[3].contains(" - "));
        assert!(lines[4].contains("pencil case"));
    }

    #[test]
    fn test_describe_update() {
        assert_eq!(
            describe_update(TableKind::Books, 7, UpdateOutcome::NotFound),
            "No book with ID 7"
        );
        assert_eq!(
            describe_update(TableKind::Products, 7, UpdateOutcome::Updated(1)),
            "Updated 1 row(s)"
        );
    }
}
