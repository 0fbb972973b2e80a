// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on the inventory tables.
//!
//! Column names are interpolated into SQL only after they have been checked
//! against the table's fixed column list; values always travel as bound
//! parameters.

pub mod products;
pub mod suppliers;
pub mod transactions;
pub mod users;

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, ErrorCode, Row, params, params_from_iter};

use stockroom_core::types::ColumnValue;
use stockroom_core::{Query, Record, RecordDraft, StockroomError, Table, wire};

use crate::database::Database;

fn to_sql_value(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Int(v) => Value::Integer(*v),
        ColumnValue::Real(v) => Value::Real(*v),
        ColumnValue::Text(v) => Value::Text(v.clone()),
    }
}

/// Build the SELECT statement and its bound parameters for `query`.
///
/// Callers must have rejected unknown columns first. Without an explicit
/// order rows come back by key; with one, NULLs sort last and ties fall back
/// to key order in the same direction.
pub(crate) fn select_sql(table: Table, query: &Query) -> (String, Vec<Value>) {
    let columns = table
        .columns()
        .iter()
        .map(|c| format!("r.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = if joins_product(table, query) {
        format!(
            "SELECT {columns}, p.name, p.sku FROM transactions r \
             LEFT JOIN products p ON p.id = r.product_id"
        )
    } else {
        format!("SELECT {columns} FROM {table} r")
    };

    let mut values = Vec::new();
    for (i, filter) in query.filters.iter().enumerate() {
        values.push(to_sql_value(&filter.value));
        let keyword = if i == 0 { "WHERE" } else { "AND" };
        let _ = write!(sql, " {keyword} r.{} = ?{}", filter.column, values.len());
    }

    match &query.order_by {
        Some(order) => {
            let direction = if order.descending { "DESC" } else { "ASC" };
            let _ = write!(
                sql,
                " ORDER BY r.{col} IS NULL, r.{col} {direction}, r.id {direction}",
                col = order.column
            );
        }
        None => sql.push_str(" ORDER BY r.id"),
    }

    if let Some(limit) = query.limit {
        values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        let _ = write!(sql, " LIMIT ?{}", values.len());
    }

    (sql, values)
}

fn joins_product(table: Table, query: &Query) -> bool {
    table == Table::Transactions && query.with_product
}

fn map_row(table: Table, joined: bool, row: &Row<'_>) -> rusqlite::Result<Record> {
    match table {
        Table::Products => products::from_row(row),
        Table::Suppliers => suppliers::from_row(row),
        Table::Transactions => transactions::from_row(row, joined),
        Table::Users => users::from_row(row),
    }
}

/// Run a select on an open connection.
pub(crate) fn select_rows(
    conn: &Connection,
    table: Table,
    query: &Query,
) -> rusqlite::Result<Vec<Record>> {
    let (sql, values) = select_sql(table, query);
    let joined = joins_product(table, query);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| map_row(table, joined, row))?;
    rows.collect()
}

fn select_one(conn: &Connection, table: Table, id: i64) -> rusqlite::Result<Record> {
    select_rows(conn, table, &Query::all().eq("id", id))?
        .into_iter()
        .next()
        .ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Read a nullable RFC 3339 column.
pub(crate) fn instant_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        wire::parse_instant(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Read a `YYYY-MM-DD` column.
pub(crate) fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    wire::parse_date(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn fetch_err(table: Table, e: tokio_rusqlite::Error<rusqlite::Error>) -> StockroomError {
    StockroomError::Fetch {
        table,
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

/// Constraint violations surface as validation errors; everything else is storage.
fn write_err(table: Table, e: tokio_rusqlite::Error<rusqlite::Error>) -> StockroomError {
    match &e {
        tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(failure, message))
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StockroomError::Validation {
                table,
                message: message.clone().unwrap_or_else(|| failure.to_string()),
            }
        }
        _ => crate::database::map_tr_err(e),
    }
}

/// Select rows from `table`.
pub async fn select(
    db: &Database,
    table: Table,
    query: &Query,
) -> Result<Vec<Record>, StockroomError> {
    if let Some(column) = query.unknown_column(table) {
        return Err(StockroomError::fetch(
            table,
            format!("unknown column `{column}`"),
        ));
    }
    let query = query.clone();
    db.connection()
        .call(move |conn| select_rows(conn, table, &query))
        .await
        .map_err(|e| fetch_err(table, e))
}

/// Insert a row and read it back as stored.
pub async fn insert(db: &Database, draft: RecordDraft) -> Result<Record, StockroomError> {
    let table = draft.table();
    let now = wire::format_instant(Utc::now());
    db.connection()
        .call(move |conn| -> rusqlite::Result<Record> {
            let tx = conn.transaction()?;
            let id = match &draft {
                RecordDraft::Product(p) => products::insert(&tx, p, &now)?,
                RecordDraft::Supplier(s) => suppliers::insert(&tx, s, &now)?,
                RecordDraft::Transaction(t) => transactions::insert(&tx, t)?,
                RecordDraft::User(u) => users::insert(&tx, u, &now)?,
            };
            let record = select_one(&tx, table, id)?;
            tx.commit()?;
            Ok(record)
        })
        .await
        .map_err(|e| write_err(table, e))
}

/// Overwrite every non-key column of row `id`.
pub async fn update_by_key(
    db: &Database,
    table: Table,
    id: i64,
    draft: RecordDraft,
) -> Result<Record, StockroomError> {
    if draft.table() != table {
        return Err(StockroomError::Validation {
            table,
            message: format!("payload is for {}", draft.table()),
        });
    }
    let updated = db
        .connection()
        .call(move |conn| -> rusqlite::Result<Option<Record>> {
            let tx = conn.transaction()?;
            let changed = match &draft {
                RecordDraft::Product(p) => products::update(&tx, id, p)?,
                RecordDraft::Supplier(s) => suppliers::update(&tx, id, s)?,
                RecordDraft::Transaction(t) => transactions::update(&tx, id, t)?,
                RecordDraft::User(u) => users::update(&tx, id, u)?,
            };
            if changed == 0 {
                return Ok(None);
            }
            let record = select_one(&tx, table, id)?;
            tx.commit()?;
            Ok(Some(record))
        })
        .await
        .map_err(|e| write_err(table, e))?;
    updated.ok_or(StockroomError::NotFound { table, id })
}

/// Delete row `id`.
pub async fn delete_by_key(db: &Database, table: Table, id: i64) -> Result<(), StockroomError> {
    let sql = format!("DELETE FROM {table} WHERE id = ?1");
    let changed = db
        .connection()
        .call(move |conn| conn.execute(&sql, params![id]))
        .await
        .map_err(|e| write_err(table, e))?;
    if changed == 0 {
        return Err(StockroomError::NotFound { table, id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_select_orders_by_key() {
        let (sql, values) = select_sql(Table::Users, &Query::all());
        assert_eq!(
            sql,
            "SELECT r.id, r.full_name, r.email, r.role, r.created_at FROM users r ORDER BY r.id"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn filters_order_and_limit_bind_in_sequence() {
        let query = Query::all()
            .eq("product_id", 3)
            .order_by("date", true)
            .limit(5)
            .with_product();
        let (sql, values) = select_sql(Table::Transactions, &query);
        assert!(sql.contains("LEFT JOIN products p ON p.id = r.product_id"));
        assert!(sql.contains("WHERE r.product_id = ?1"));
        assert!(sql.contains("ORDER BY r.date IS NULL, r.date DESC, r.id DESC"));
        assert!(sql.ends_with("LIMIT ?2"));
        assert_eq!(values, vec![Value::Integer(3), Value::Integer(5)]);
    }

    #[test]
    fn product_join_only_applies_to_transactions() {
        let (sql, _) = select_sql(Table::Products, &Query::all().with_product());
        assert!(!sql.contains("JOIN"));
    }
}
