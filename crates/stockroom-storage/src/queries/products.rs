// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product rows. Keys are supplied by the caller.

use rusqlite::{Connection, Row, params};

use stockroom_core::{Product, Record, wire};

use super::instant_at;

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Product(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        sku: row.get(2)?,
        quantity: row.get(3)?,
        price: row.get(4)?,
        supplier_id: row.get(5)?,
        category: row.get(6)?,
        min_stock_level: row.get(7)?,
        created_at: instant_at(row, 8)?,
    }))
}

pub(crate) fn insert(conn: &Connection, p: &Product, now: &str) -> rusqlite::Result<i64> {
    let created_at = p
        .created_at
        .map(wire::format_instant)
        .unwrap_or_else(|| now.to_string());
    conn.execute(
        "INSERT INTO products (id, name, sku, quantity, price, supplier_id, category, min_stock_level, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            p.id,
            p.name,
            p.sku,
            p.quantity,
            p.price,
            p.supplier_id,
            p.category,
            p.min_stock_level,
            created_at,
        ],
    )?;
    Ok(p.id)
}

/// The key in the payload is ignored; `id` addresses the row.
pub(crate) fn update(conn: &Connection, id: i64, p: &Product) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE products SET name = ?2, sku = ?3, quantity = ?4, price = ?5, supplier_id = ?6,
         category = ?7, min_stock_level = ?8
         WHERE id = ?1",
        params![
            id,
            p.name,
            p.sku,
            p.quantity,
            p.price,
            p.supplier_id,
            p.category,
            p.min_stock_level,
        ],
    )
}
