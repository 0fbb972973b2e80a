// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data store trait for relational CRUD and per-table change feeds.

use async_trait::async_trait;

use crate::change::{ChangeSubscription, EventMask};
use crate::error::StockroomError;
use crate::query::Query;
use crate::traits::collaborator::Collaborator;
use crate::types::{Record, RecordDraft, Table};

/// A relational store with CRUD over the inventory tables and row-level
/// change notification.
///
/// Timeouts and transport errors are the implementation's own; callers
/// propagate them unchanged.
#[async_trait]
pub trait DataStore: Collaborator {
    /// Select rows from `table` matching `query`.
    ///
    /// Queries naming columns the table does not have are rejected with
    /// [`StockroomError::Fetch`].
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Record>, StockroomError>;

    /// Insert a row and return it as stored, with any store-assigned key.
    async fn insert(&self, draft: RecordDraft) -> Result<Record, StockroomError>;

    /// Overwrite every non-key column of the row keyed by `id`.
    async fn update_by_key(
        &self,
        table: Table,
        id: i64,
        draft: RecordDraft,
    ) -> Result<Record, StockroomError>;

    /// Delete the row keyed by `id`.
    async fn delete_by_key(&self, table: Table, id: i64) -> Result<(), StockroomError>;

    /// Open a change feed for `table`. Dropping the returned handle unsubscribes.
    async fn subscribe(
        &self,
        table: Table,
        mask: EventMask,
    ) -> Result<ChangeSubscription, StockroomError>;
}
