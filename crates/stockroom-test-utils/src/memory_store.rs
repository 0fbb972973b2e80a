// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory data store for deterministic testing.
//!
//! `MemoryStore` implements `DataStore` over plain vectors, publishes change
//! events through a [`ChangeHub`], and can be told to fail selects or
//! subscriptions per table.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use stockroom_core::types::{KeyPolicy, ProductSummary};
use stockroom_core::{
    ChangeEvent, ChangeHub, ChangeKind, ChangeSubscription, Collaborator, DataStore, EventMask,
    HealthStatus, Query, Record, RecordDraft, StockroomError, Table,
};

#[derive(Default)]
struct Failures {
    select: HashSet<Table>,
    subscribe: HashSet<Table>,
    writes: bool,
}

/// A `DataStore` held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<Table, Vec<Record>>>,
    failures: Mutex<Failures>,
    hub: ChangeHub,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `records`. No change events are emitted.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        {
            let mut rows = lock(&store.rows);
            for record in records {
                rows.entry(record.table()).or_default().push(record);
            }
        }
        store
    }

    /// Make every `select` on `table` fail until cleared.
    pub fn fail_selects(&self, table: Table, fail: bool) {
        let mut failures = lock(&self.failures);
        if fail {
            failures.select.insert(table);
        } else {
            failures.select.remove(&table);
        }
    }

    /// Make `subscribe` on `table` fail until cleared.
    pub fn fail_subscribe(&self, table: Table, fail: bool) {
        let mut failures = lock(&self.failures);
        if fail {
            failures.subscribe.insert(table);
        } else {
            failures.subscribe.remove(&table);
        }
    }

    /// Make inserts, updates, and deletes fail until cleared.
    pub fn fail_writes(&self, fail: bool) {
        lock(&self.failures).writes = fail;
    }

    /// Number of live change-feed subscribers across all tables.
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    /// Snapshot of the stored rows of `table`, in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Record> {
        lock(&self.rows).get(&table).cloned().unwrap_or_default()
    }

    fn check_writes(&self, table: Table) -> Result<(), StockroomError> {
        if lock(&self.failures).writes {
            return Err(StockroomError::Storage {
                source: format!("injected write failure on {table}").into(),
            });
        }
        Ok(())
    }

    fn publish(&self, table: Table, kind: ChangeKind, id: i64) {
        let delivered = self.hub.publish(ChangeEvent { table, kind, id });
        tracing::debug!(%table, %kind, id, delivered, "memory store change published");
    }
}

/// Attach `{name, sku}` of the referenced product to each transaction.
fn join_products(rows: &mut [Record], products: &[Record]) {
    for row in rows {
        if let Record::Transaction(tx) = row {
            tx.product = products.iter().find_map(|p| match p {
                Record::Product(p) if p.id == tx.product_id => Some(ProductSummary {
                    name: p.name.clone(),
                    sku: p.sku.clone(),
                }),
                _ => None,
            });
        }
    }
}

#[async_trait]
impl Collaborator for MemoryStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    async fn health_check(&self) -> Result<HealthStatus, StockroomError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Record>, StockroomError> {
        if lock(&self.failures).select.contains(&table) {
            return Err(StockroomError::fetch(table, "injected select failure"));
        }
        if let Some(column) = query.unknown_column(table) {
            return Err(StockroomError::fetch(
                table,
                format!("unknown column `{column}`"),
            ));
        }

        let rows = lock(&self.rows);
        let mut selected = rows.get(&table).cloned().unwrap_or_default();
        if query.with_product && table == Table::Transactions {
            let products = rows.get(&Table::Products).map(Vec::as_slice).unwrap_or(&[]);
            join_products(&mut selected, products);
        }
        drop(rows);
        Ok(query.apply(selected))
    }

    async fn insert(&self, draft: RecordDraft) -> Result<Record, StockroomError> {
        let table = draft.table();
        self.check_writes(table)?;

        let record = {
            let mut rows = lock(&self.rows);
            let existing = rows.entry(table).or_default();
            let next = existing.iter().map(Record::id).max().unwrap_or(0) + 1;
            let id = match (table.key_policy(), draft.supplied_key()) {
                (KeyPolicy::Caller, Some(id)) | (KeyPolicy::StoreUnlessSupplied, Some(id)) => id,
                (KeyPolicy::Caller, None) => {
                    return Err(StockroomError::Validation {
                        table,
                        message: "id is required".into(),
                    });
                }
                _ => next,
            };
            if existing.iter().any(|r| r.id() == id) {
                return Err(StockroomError::Validation {
                    table,
                    message: format!("duplicate key {id}"),
                });
            }
            let record = draft.into_record(id, Some(Utc::now()));
            existing.push(record.clone());
            record
        };

        self.publish(table, ChangeKind::Insert, record.id());
        Ok(record)
    }

    async fn update_by_key(
        &self,
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
        self.check_writes(table)?;

        let record = {
            let mut rows = lock(&self.rows);
            let slot = rows
                .get_mut(&table)
                .and_then(|rows| rows.iter_mut().find(|r| r.id() == id))
                .ok_or(StockroomError::NotFound { table, id })?;
            let created_at = match slot {
                Record::Product(p) => p.created_at,
                Record::Supplier(s) => s.created_at,
                Record::User(u) => u.created_at,
                Record::Transaction(_) => None,
            };
            *slot = draft.into_record(id, created_at);
            slot.clone()
        };

        self.publish(table, ChangeKind::Update, id);
        Ok(record)
    }

    async fn delete_by_key(&self, table: Table, id: i64) -> Result<(), StockroomError> {
        self.check_writes(table)?;
        {
            let mut rows = lock(&self.rows);
            let rows = rows.entry(table).or_default();
            let before = rows.len();
            rows.retain(|r| r.id() != id);
            if rows.len() == before {
                return Err(StockroomError::NotFound { table, id });
            }
        }
        self.publish(table, ChangeKind::Delete, id);
        Ok(())
    }

    async fn subscribe(
        &self,
        table: Table,
        mask: EventMask,
    ) -> Result<ChangeSubscription, StockroomError> {
        if lock(&self.failures).subscribe.contains(&table) {
            return Err(StockroomError::Subscription {
                table,
                message: "injected subscribe failure".into(),
            });
        }
        Ok(self.hub.subscribe(table, mask))
    }
}
