// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live notification feed.
//!
//! [`NotificationFeed::start`] subscribes to the product and transaction
//! change feeds, publishes an initial snapshot, and then re-fetches and
//! rebuilds the whole notification list once per change event. There is no
//! incremental patching.
//!
//! All rebuilds for one feed run sequentially inside a single worker task, so
//! each rebuild reads a snapshot taken after the event that triggered it and
//! completions are delivered in trigger order. Every published snapshot
//! carries a strictly increasing `generation` so consumers can drop stale
//! ones if they hop threads.
//!
//! Failure handling:
//! - a failed fetch keeps the previous notifications and sets `error`;
//! - a failed subscription setup releases whatever was acquired and leaves
//!   the feed static (`live == false`), logged at warn level;
//! - if one table's change feed closes the feed keeps following the other,
//!   and only goes static once both are closed.

use std::sync::Arc;

use stockroom_config::model::NotificationsConfig;
use stockroom_core::{
    ChangeEvent, ChangeSubscription, DataStore, EventMask, StockroomError, Table,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator::build_notifications;
use crate::clock::Clock;
use crate::notification::Notification;
use crate::source::{fetch_products, fetch_recent_transactions};

/// One published state of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    /// Increases by one on every rebuild attempt, successful or not.
    pub generation: u64,
    pub notifications: Vec<Notification>,
    /// Set when the latest rebuild failed; `notifications` then holds the
    /// last successful result.
    pub error: Option<String>,
    /// Whether change events are still being received.
    pub live: bool,
}

/// Listener invoked with every published snapshot.
pub type FeedCallback = Arc<dyn Fn(&FeedSnapshot) + Send + Sync>;

/// Builds notification lists from a data store.
#[derive(Clone)]
pub struct NotificationFeed {
    store: Arc<dyn DataStore>,
    clock: Arc<dyn Clock>,
    recent_limit: usize,
}

impl NotificationFeed {
    pub fn new(
        store: Arc<dyn DataStore>,
        clock: Arc<dyn Clock>,
        config: &NotificationsConfig,
    ) -> Self {
        Self {
            store,
            clock,
            recent_limit: config.recent_transaction_limit,
        }
    }

    /// Fetch a fresh snapshot of products and recent transactions and build
    /// the notification list once.
    pub async fn build(&self) -> Result<Vec<Notification>, StockroomError> {
        let products = fetch_products(self.store.as_ref()).await?;
        let recent = fetch_recent_transactions(self.store.as_ref(), self.recent_limit).await?;
        Ok(build_notifications(&products, &recent, self.clock.now()))
    }

    /// Start the live feed.
    ///
    /// The initial snapshot is delivered to `on_update` before this returns.
    /// Dropping or stopping the returned handle releases both subscriptions.
    pub async fn start<F>(&self, on_update: F) -> FeedHandle
    where
        F: Fn(&FeedSnapshot) + Send + Sync + 'static,
    {
        let subscriptions = match FeedSubscriptions::acquire(self.store.as_ref()).await {
            Ok(subscriptions) => Some(subscriptions),
            Err(e) => {
                warn!(error = %e, "live updates unavailable, serving a static notification feed");
                None
            }
        };

        let cancel = CancellationToken::new();
        let mut worker = FeedWorker {
            feed: self.clone(),
            on_update: Arc::new(on_update),
            cancel: cancel.clone(),
            snapshot: FeedSnapshot {
                generation: 0,
                notifications: Vec::new(),
                error: None,
                live: subscriptions.is_some(),
            },
        };
        worker.rebuild().await;

        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(worker.run(subscriptions, refresh_rx));
        info!(store = self.store.name(), "notification feed started");

        FeedHandle {
            cancel,
            refresh: refresh_tx,
            task: Some(task),
        }
    }
}

/// Both change feeds, acquired and released together.
///
/// A table whose feed closes is dropped on its own; the other keeps
/// delivering until it closes too.
struct FeedSubscriptions {
    products: Option<ChangeSubscription>,
    transactions: Option<ChangeSubscription>,
}

impl FeedSubscriptions {
    /// Subscribe to both tables. If the second subscription fails the first
    /// is dropped, which releases it.
    async fn acquire(store: &dyn DataStore) -> Result<Self, StockroomError> {
        let products = store.subscribe(Table::Products, EventMask::ALL).await?;
        let transactions = store.subscribe(Table::Transactions, EventMask::ALL).await?;
        Ok(Self {
            products: Some(products),
            transactions: Some(transactions),
        })
    }

    /// Next event from either table, or `None` once both feeds are closed.
    async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            if self.products.is_none() && self.transactions.is_none() {
                return None;
            }
            let (table, event) = tokio::select! {
                event = recv_from(&mut self.products) => (Table::Products, event),
                event = recv_from(&mut self.transactions) => (Table::Transactions, event),
            };
            match event {
                Some(event) => return Some(event),
                None => {
                    warn!(%table, "change feed closed, still following the other table");
                    match table {
                        Table::Products => self.products = None,
                        _ => self.transactions = None,
                    }
                }
            }
        }
    }
}

async fn recv_from(subscription: &mut Option<ChangeSubscription>) -> Option<ChangeEvent> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_change(subscriptions: &mut Option<FeedSubscriptions>) -> Option<ChangeEvent> {
    match subscriptions {
        Some(subs) => subs.next().await,
        None => std::future::pending().await,
    }
}

struct FeedWorker {
    feed: NotificationFeed,
    on_update: FeedCallback,
    cancel: CancellationToken,
    snapshot: FeedSnapshot,
}

impl FeedWorker {
    async fn run(
        mut self,
        mut subscriptions: Option<FeedSubscriptions>,
        mut refresh: mpsc::UnboundedReceiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = next_change(&mut subscriptions) => match event {
                    Some(event) => {
                        debug!(table = %event.table, kind = %event.kind, id = event.id, "change received, rebuilding notifications");
                        self.rebuild().await;
                    }
                    None => {
                        warn!("both change feeds closed, notification feed is now static");
                        subscriptions = None;
                        self.snapshot.live = false;
                    }
                },
                Some(()) = refresh.recv() => {
                    debug!("manual refresh requested");
                    self.rebuild().await;
                }
            }
        }
        drop(subscriptions);
        debug!("notification feed stopped");
    }

    async fn rebuild(&mut self) {
        self.snapshot.generation += 1;
        match self.feed.build().await {
            Ok(notifications) => {
                debug!(
                    generation = self.snapshot.generation,
                    count = notifications.len(),
                    "notifications rebuilt"
                );
                self.snapshot.notifications = notifications;
                self.snapshot.error = None;
            }
            Err(e) => {
                warn!(
                    generation = self.snapshot.generation,
                    error = %e,
                    "notification rebuild failed, keeping previous list"
                );
                self.snapshot.error = Some(e.to_string());
            }
        }
        if !self.cancel.is_cancelled() {
            (self.on_update)(&self.snapshot);
        }
    }
}

/// Disposer for a running feed.
#[derive(Debug)]
pub struct FeedHandle {
    cancel: CancellationToken,
    refresh: mpsc::UnboundedSender<()>,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Ask the worker for an out-of-band rebuild. Returns `false` once stopped.
    pub fn refresh(&self) -> bool {
        !self.cancel.is_cancelled() && self.refresh.send(()).is_ok()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the feed and wait for the worker to release its subscriptions.
    /// No callback is delivered after this returns.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "notification feed worker ended abnormally");
            }
        }
        info!("notification feed stopped");
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stockroom_core::{ChangeHub, ChangeKind};

    fn event(table: Table, id: i64) -> ChangeEvent {
        ChangeEvent {
            table,
            kind: ChangeKind::Insert,
            id,
        }
    }

    async fn next_within(subs: &mut FeedSubscriptions) -> Option<ChangeEvent> {
        tokio::time::timeout(Duration::from_secs(2), subs.next())
            .await
            .expect("timed out waiting for a change")
    }

    #[tokio::test]
    async fn one_closed_table_does_not_silence_the_other() {
        let product_hub = ChangeHub::new();
        let transaction_hub = ChangeHub::new();
        let mut subs = FeedSubscriptions {
            products: Some(product_hub.subscribe(Table::Products, EventMask::ALL)),
            transactions: Some(transaction_hub.subscribe(Table::Transactions, EventMask::ALL)),
        };

        // Dropping the only hub drops its senders, closing the product feed.
        drop(product_hub);
        transaction_hub.publish(event(Table::Transactions, 7));
        let received = next_within(&mut subs).await.unwrap();
        assert_eq!((received.table, received.id), (Table::Transactions, 7));

        transaction_hub.publish(event(Table::Transactions, 8));
        assert_eq!(next_within(&mut subs).await.unwrap().id, 8);

        drop(transaction_hub);
        assert!(next_within(&mut subs).await.is_none());
    }
}
