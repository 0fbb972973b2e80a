// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DataStore trait.
//!
//! Every successful insert, update, and delete made through this store is
//! published to subscribers after the statement commits.
//!
//! SQLite has no row-level notification for commits made by other
//! connections. A file-backed store therefore polls `PRAGMA data_version`
//! once it has subscribers; when another connection (another process, or
//! another store on the same file) commits, every table is reported as
//! [`ChangeKind::Update`] with id 0 because the changed rows are unknown.
//! Commits on this store's own connection do not move `data_version`, so
//! they are never reported twice.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use stockroom_config::model::StorageConfig;
use stockroom_core::{
    ChangeEvent, ChangeHub, ChangeKind, ChangeSubscription, Collaborator, DataStore, EventMask,
    HealthStatus, Query, Record, RecordDraft, StockroomError, Table,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// How often a file-backed store checks for commits from other connections.
pub const EXTERNAL_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// SQLite-backed data store.
pub struct SqliteStore {
    db: Database,
    hub: ChangeHub,
    watch_external: bool,
    /// Cancels the `data_version` poller; `None` until the first subscribe.
    watcher: Mutex<Option<CancellationToken>>,
}

impl SqliteStore {
    /// Wrap `db`. Only writes made through this store reach subscribers.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            hub: ChangeHub::new(),
            watch_external: false,
            watcher: Mutex::new(None),
        }
    }

    /// Open the database named by the storage configuration. Subscribers
    /// also hear about commits made by other connections to the same file.
    pub async fn open(config: &StorageConfig) -> Result<Self, StockroomError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        let mut store = Self::new(db);
        store.watch_external = true;
        Ok(store)
    }

    pub async fn open_in_memory() -> Result<Self, StockroomError> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), StockroomError> {
        self.db.checkpoint().await
    }

    fn publish(&self, table: Table, kind: ChangeKind, id: i64) {
        let delivered = self.hub.publish(ChangeEvent { table, kind, id });
        debug!(%table, %kind, id, delivered, "change published");
    }

    /// Start the `data_version` poller if it is not running yet.
    async fn ensure_external_watch(&self) -> Result<(), StockroomError> {
        if !self.watch_external || self.watcher_slot().is_some() {
            return Ok(());
        }
        // Read the baseline before spawning so a commit racing this
        // subscribe is still seen as a change.
        let baseline = data_version(&self.db).await?;

        let mut slot = self.watcher_slot();
        if slot.is_none() {
            let cancel = CancellationToken::new();
            tokio::spawn(poll_external_commits(
                self.db.clone(),
                self.hub.clone(),
                baseline,
                cancel.clone(),
            ));
            debug!(
                interval_ms = EXTERNAL_POLL_INTERVAL.as_millis() as u64,
                "external commit watch started"
            );
            *slot = Some(cancel);
        }
        Ok(())
    }

    fn watcher_slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.watcher.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        if let Some(cancel) = self.watcher_slot().take() {
            cancel.cancel();
        }
    }
}

async fn data_version(db: &Database) -> Result<i64, StockroomError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("PRAGMA data_version", [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
}

async fn poll_external_commits(
    db: Database,
    hub: ChangeHub,
    mut last: i64,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(EXTERNAL_POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failing = false;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if hub.subscriber_count() == 0 {
            continue;
        }
        let version = match data_version(&db).await {
            Ok(version) => version,
            Err(e) => {
                if !failing {
                    warn!(error = %e, "external commit check failed");
                    failing = true;
                }
                continue;
            }
        };
        failing = false;
        if version == last {
            continue;
        }
        last = version;
        let delivered: usize = Table::ALL
            .into_iter()
            .map(|table| {
                hub.publish(ChangeEvent {
                    table,
                    kind: ChangeKind::Update,
                    id: 0,
                })
            })
            .sum();
        debug!(version, delivered, "external commit published");
    }
    debug!("external commit watch stopped");
}

#[async_trait]
impl Collaborator for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, StockroomError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Record>, StockroomError> {
        let rows = queries::select(&self.db, table, query).await?;
        debug!(%table, count = rows.len(), "select");
        Ok(rows)
    }

    async fn insert(&self, draft: RecordDraft) -> Result<Record, StockroomError> {
        let record = queries::insert(&self.db, draft).await?;
        self.publish(record.table(), ChangeKind::Insert, record.id());
        Ok(record)
    }

    async fn update_by_key(
        &self,
        table: Table,
        id: i64,
        draft: RecordDraft,
    ) -> Result<Record, StockroomError> {
        let record = queries::update_by_key(&self.db, table, id, draft).await?;
        self.publish(table, ChangeKind::Update, id);
        Ok(record)
    }

    async fn delete_by_key(&self, table: Table, id: i64) -> Result<(), StockroomError> {
        queries::delete_by_key(&self.db, table, id).await?;
        self.publish(table, ChangeKind::Delete, id);
        Ok(())
    }

    async fn subscribe(
        &self,
        table: Table,
        mask: EventMask,
    ) -> Result<ChangeSubscription, StockroomError> {
        self.ensure_external_watch()
            .await
            .map_err(|e| StockroomError::Subscription {
                table,
                message: e.to_string(),
            })?;
        Ok(self.hub.subscribe(table, mask))
    }
}
