// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for rows and notifications.

use colored::Colorize;

use stockroom_admin::filter::display_cells;
use stockroom_core::{Record, Table};
use stockroom_notify::{Notification, Severity};

/// Longest cell printed before truncation.
const MAX_CELL: usize = 32;

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(MAX_CELL - 3).collect();
    short.push_str("...");
    short
}

/// Rows of `table` as an aligned text grid with a header line.
pub fn render_rows(table: Table, rows: &[&Record], use_color: bool) -> String {
    let headers = table.columns();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| display_cells(r).iter().map(|c| truncate(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_values: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let header = line(&header_values);
    let mut out = if use_color {
        header.bold().to_string()
    } else {
        header
    };
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// One notification as a single line.
pub fn render_notification(notification: &Notification, use_color: bool) -> String {
    let at = notification.timestamp.format("%Y-%m-%d %H:%M");
    let tag = match (notification.severity, use_color) {
        (Severity::Warning, true) => "!".yellow().bold().to_string(),
        (Severity::Info, true) => "i".cyan().to_string(),
        (Severity::Warning, false) => "[WARN]".to_string(),
        (Severity::Info, false) => "[INFO]".to_string(),
    };
    format!(
        "{tag} {at}  {}: {}",
        notification.title, notification.message
    )
}
