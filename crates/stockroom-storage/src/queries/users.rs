// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff profile rows. Credentials are not stored here.

use rusqlite::{Connection, Row, params};

use stockroom_core::types::UserDraft;
use stockroom_core::{Record, User};

use super::instant_at;

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::User(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        created_at: instant_at(row, 4)?,
    }))
}

pub(crate) fn insert(conn: &Connection, u: &UserDraft, now: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (full_name, email, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![u.full_name, u.email, u.role, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn update(conn: &Connection, id: i64, u: &UserDraft) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE users SET full_name = ?2, email = ?3, role = ?4 WHERE id = ?1",
        params![id, u.full_name, u.email, u.role],
    )
}
