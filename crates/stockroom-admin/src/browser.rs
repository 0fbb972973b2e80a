// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table browser: the currently selected table, its rows, and the search box.

use std::sync::Arc;

use tracing::{info, warn};

use stockroom_core::{DataStore, Query, Record, StockroomError, Table};

use crate::filter;

/// Rows of one table as last loaded from the store.
pub struct TableBrowser {
    store: Arc<dyn DataStore>,
    table: Table,
    rows: Vec<Record>,
    error: Option<String>,
    search: String,
}

impl TableBrowser {
    /// A browser positioned on `table`. Nothing is loaded until [`reload`](Self::reload).
    pub fn new(store: Arc<dyn DataStore>, table: Table) -> Self {
        Self {
            store,
            table,
            rows: Vec::new(),
            error: None,
            search: String::new(),
        }
    }

    /// Sidebar entries, in display order.
    pub fn tables() -> &'static [Table] {
        &Table::ALL
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn headers(&self) -> &'static [&'static str] {
        self.table.columns()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// The message of the last failed load, cleared by the next successful one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, needle: impl Into<String>) {
        self.search = needle.into();
    }

    /// Rows matching the current search.
    pub fn visible_rows(&self) -> Vec<&Record> {
        filter::filter_rows(&self.rows, &self.search)
    }

    pub fn find(&self, id: i64) -> Option<&Record> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Switch to `table` and load it. Rows and search from the previous table
    /// are dropped.
    pub async fn select_table(&mut self, table: Table) -> Result<(), StockroomError> {
        if table != self.table {
            self.table = table;
            self.rows.clear();
            self.search.clear();
        }
        self.reload().await
    }

    /// Load every row of the current table. On failure the previous rows are
    /// kept and the error is recorded.
    pub async fn reload(&mut self) -> Result<(), StockroomError> {
        match self.store.select(self.table, &Query::all()).await {
            Ok(rows) => {
                self.rows = rows;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(table = %self.table, error = %e, "table load failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete row `id` and reload on success. A failed delete leaves the rows
    /// untouched.
    pub async fn delete(&mut self, id: i64) -> Result<(), StockroomError> {
        self.store.delete_by_key(self.table, id).await?;
        info!(table = %self.table, id, "record deleted");
        self.reload().await
    }
}
