// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transaction rows, optionally joined with their product's name and SKU.

use rusqlite::{Connection, Row, params};

use stockroom_core::types::TransactionDraft;
use stockroom_core::{ProductSummary, Record, Transaction, wire};

use super::date_at;

/// `joined` rows carry `p.name, p.sku` after the table's own columns. Both
/// are NULL when the product no longer exists.
pub(crate) fn from_row(row: &Row<'_>, joined: bool) -> rusqlite::Result<Record> {
    let product = if joined {
        let name: Option<String> = row.get(6)?;
        let sku: Option<String> = row.get(7)?;
        match (name, sku) {
            (Some(name), Some(sku)) => Some(ProductSummary { name, sku }),
            _ => None,
        }
    } else {
        None
    };

    Ok(Record::Transaction(Transaction {
        id: row.get(0)?,
        product_id: row.get(1)?,
        quantity_sold: row.get(2)?,
        date: date_at(row, 3)?,
        total: row.get(4)?,
        user_id: row.get(5)?,
        product,
    }))
}

/// A NULL id lets SQLite assign the key.
pub(crate) fn insert(conn: &Connection, t: &TransactionDraft) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (id, product_id, quantity_sold, date, total, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.id,
            t.product_id,
            t.quantity_sold,
            wire::format_date(t.date),
            t.total,
            t.user_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn update(conn: &Connection, id: i64, t: &TransactionDraft) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE transactions SET product_id = ?2, quantity_sold = ?3, date = ?4, total = ?5,
         user_id = ?6
         WHERE id = ?1",
        params![
            id,
            t.product_id,
            t.quantity_sold,
            wire::format_date(t.date),
            t.total,
            t.user_id,
        ],
    )
}
