// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side row filtering over the displayed cells.

use stockroom_core::{Record, wire};

/// Display text of one column. NULL renders as an empty string and
/// `created_at` renders as its UTC calendar date.
pub fn display_cell(record: &Record, column: &str) -> String {
    if column == "created_at" {
        let created_at = match record {
            Record::Product(p) => p.created_at,
            Record::Supplier(s) => s.created_at,
            Record::User(u) => u.created_at,
            Record::Transaction(_) => None,
        };
        return created_at
            .map(|at| wire::format_date(at.date_naive()))
            .unwrap_or_default();
    }
    record
        .column(column)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

/// Display text of every column, in the table's column order.
pub fn display_cells(record: &Record) -> Vec<String> {
    record
        .table()
        .columns()
        .iter()
        .map(|column| display_cell(record, column))
        .collect()
}

/// Case-insensitive substring match against any displayed cell. A blank
/// needle matches everything.
pub fn matches(record: &Record, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    display_cells(record)
        .iter()
        .any(|cell| cell.to_lowercase().contains(&needle))
}

pub fn filter_rows<'a>(rows: &'a [Record], needle: &str) -> Vec<&'a Record> {
    rows.iter().filter(|r| matches(r, needle)).collect()
}
