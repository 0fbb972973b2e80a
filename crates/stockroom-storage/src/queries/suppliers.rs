// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supplier rows.

use rusqlite::{Connection, Row, params};

use stockroom_core::types::SupplierDraft;
use stockroom_core::{Record, Supplier};

use super::instant_at;

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Supplier(Supplier {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        contact_person: row.get(3)?,
        contact_number: row.get(4)?,
        email: row.get(5)?,
        created_at: instant_at(row, 6)?,
    }))
}

pub(crate) fn insert(conn: &Connection, s: &SupplierDraft, now: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO suppliers (name, address, contact_person, contact_number, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![s.name, s.address, s.contact_person, s.contact_number, s.email, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn update(conn: &Connection, id: i64, s: &SupplierDraft) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE suppliers SET name = ?2, address = ?3, contact_person = ?4, contact_number = ?5,
         email = ?6
         WHERE id = ?1",
        params![id, s.name, s.address, s.contact_person, s.contact_number, s.email],
    )
}
