// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-table change feeds and the subscription handles that scope them.
//!
//! A subscription is released exactly once: either through an explicit
//! `unsubscribe()` or when its handle is dropped. [`ChangeHub`] is the
//! subscriber registry store implementations publish into.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::Table;

/// Kind of row mutation reported on a change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Which change kinds a subscriber wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMask {
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
}

impl EventMask {
    pub const ALL: EventMask = EventMask {
        insert: true,
        update: true,
        delete: true,
    };

    pub const INSERT: EventMask = EventMask {
        insert: true,
        update: false,
        delete: false,
    };

    pub fn contains(self, kind: ChangeKind) -> bool {
        match kind {
            ChangeKind::Insert => self.insert,
            ChangeKind::Update => self.update,
            ChangeKind::Delete => self.delete,
        }
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// A single row mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: i64,
}

/// Releases a subscription when dropped.
pub struct SubscriptionGuard {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl SubscriptionGuard {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Release now instead of at drop.
    pub fn unsubscribe(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// A live change feed for one table.
#[derive(Debug)]
pub struct ChangeSubscription {
    table: Table,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    guard: SubscriptionGuard,
}

impl ChangeSubscription {
    pub fn new(
        table: Table,
        events: mpsc::UnboundedReceiver<ChangeEvent>,
        guard: SubscriptionGuard,
    ) -> Self {
        Self {
            table,
            events,
            guard,
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    /// Wait for the next event. Returns `None` once the feed is closed.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    /// Stop receiving events and release the feed.
    pub fn unsubscribe(self) {
        self.guard.unsubscribe();
    }
}

struct Subscriber {
    id: u64,
    table: Table,
    mask: EventMask,
    sender: mpsc::UnboundedSender<ChangeEvent>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Fan-out registry for change events.
#[derive(Clone, Default)]
pub struct ChangeHub {
    inner: Arc<Mutex<HubInner>>,
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    // A panicking publisher cannot leave the registry half-updated.
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for `table` filtered by `mask`.
    pub fn subscribe(&self, table: Table, mask: EventMask) -> ChangeSubscription {
        let (sender, events) = mpsc::unbounded_channel();
        let id = {
            let mut inner = lock(&self.inner);
            inner.next_id += 1;
            let id = inner.next_id;
            inner.subscribers.push(Subscriber {
                id,
                table,
                mask,
                sender,
            });
            id
        };
        debug!(%table, subscriber = id, "change feed subscribed");

        let weak: Weak<Mutex<HubInner>> = Arc::downgrade(&self.inner);
        let guard = SubscriptionGuard::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).subscribers.retain(|s| s.id != id);
                debug!(%table, subscriber = id, "change feed released");
            }
        });
        ChangeSubscription::new(table, events, guard)
    }

    /// Deliver `event` to every matching subscriber. Returns the delivery count.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let mut inner = lock(&self.inner);
        inner.subscribers.retain(|s| !s.sender.is_closed());
        let mut delivered = 0;
        for subscriber in inner
            .subscribers
            .iter()
            .filter(|s| s.table == event.table && s.mask.contains(event.kind))
        {
            if subscriber.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of registered subscribers across all tables.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }
}
