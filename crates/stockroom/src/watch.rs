// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom notifications` and `stockroom watch`.
//!
//! `watch` keeps a live [`NotificationFeed`] running and prints each
//! notification the first time it appears, until SIGINT or SIGTERM.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockroom_admin::NotificationPanel;
use stockroom_config::model::NotificationsConfig;
use stockroom_core::{DataStore, StockroomError};
use stockroom_notify::{FeedSnapshot, NotificationFeed, SystemClock};

use crate::render::render_notification;

pub async fn run_notifications<S: DataStore + 'static>(
    store: Arc<S>,
    config: &NotificationsConfig,
    json: bool,
    use_color: bool,
) -> Result<(), StockroomError> {
    let feed = NotificationFeed::new(store, Arc::new(SystemClock), config);
    let notifications = feed.build().await?;

    if json {
        let out = serde_json::to_string_pretty(&notifications)
            .map_err(|e| StockroomError::Internal(format!("failed to encode notifications: {e}")))?;
        println!("{out}");
        return Ok(());
    }
    if notifications.is_empty() {
        println!("No notifications.");
    }
    for notification in &notifications {
        println!("{}", render_notification(notification, use_color));
    }
    Ok(())
}

/// Panel state plus the ids already printed.
#[derive(Default)]
struct WatchView {
    panel: NotificationPanel,
    printed: HashSet<String>,
    last_error: Option<String>,
    live: Option<bool>,
}

impl WatchView {
    /// Apply `snapshot` and return the lines to print for it.
    fn apply(&mut self, snapshot: &FeedSnapshot, use_color: bool) -> Vec<String> {
        if !self.panel.apply(snapshot) {
            return Vec::new();
        }
        let mut lines = Vec::new();

        if self.live != Some(self.panel.is_live()) {
            if !self.panel.is_live() {
                lines.push("(live updates unavailable, showing a static list)".to_string());
            }
            self.live = Some(self.panel.is_live());
        }

        let error = self.panel.error().map(str::to_string);
        if error != self.last_error {
            if let Some(message) = &error {
                let line = format!("refresh failed: {message}");
                lines.push(if use_color { line.red().to_string() } else { line });
            }
            self.last_error = error;
        }

        for notification in self.panel.visible() {
            if self.printed.insert(notification.id.clone()) {
                lines.push(render_notification(notification, use_color));
            }
        }
        // Forget ids that resolved so a recurrence prints again.
        let present: HashSet<&str> = self.panel.visible().iter().map(|n| n.id.as_str()).collect();
        self.printed.retain(|id| present.contains(id.as_str()));
        lines
    }
}

pub async fn run_watch<S: DataStore + 'static>(
    store: Arc<S>,
    config: &NotificationsConfig,
    use_color: bool,
) -> Result<(), StockroomError> {
    let shutdown = install_signal_handler();
    let feed = NotificationFeed::new(store, Arc::new(SystemClock), config);

    let view = Arc::new(Mutex::new(WatchView::default()));
    let sink = Arc::clone(&view);
    let handle = feed
        .start(move |snapshot| {
            let mut view = sink.lock().unwrap_or_else(|p| p.into_inner());
            for line in view.apply(snapshot, use_color) {
                println!("{line}");
            }
        })
        .await;

    println!("Watching notifications. Press Ctrl+C to stop.");
    shutdown.cancelled().await;
    handle.stop().await;
    info!("watch stopped");
    Ok(())
}

/// Cancel the returned token on SIGINT (Ctrl+C) or SIGTERM.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => info!("received SIGINT (Ctrl+C), stopping"),
                        _ = sigterm.recv() => info!("received SIGTERM, stopping"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C only");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            info!("received Ctrl+C, stopping");
        }

        trigger.cancel();
        debug!("signal handler completed");
    });

    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Product;
    use stockroom_notify::build_notifications;
    use stockroom_test_utils::fixtures::{instant, product};

    fn snapshot(generation: u64, products: &[Product], error: Option<&str>) -> FeedSnapshot {
        FeedSnapshot {
            generation,
            notifications: build_notifications(products, &[], instant("2026-03-10T12:00:00Z")),
            error: error.map(str::to_string),
            live: true,
        }
    }

    #[test]
    fn each_notification_prints_once() {
        let mut view = WatchView::default();
        let low = [product(1, "Bolt", 0, 2), product(2, "Nut", 1, 5)];

        assert_eq!(view.apply(&snapshot(1, &low[..1], None), false).len(), 1);
        let lines = view.apply(&snapshot(2, &low, None), false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Nut"));
        assert!(view.apply(&snapshot(3, &low, None), false).is_empty());
    }

    #[test]
    fn stale_snapshots_print_nothing() {
        let mut view = WatchView::default();
        let low = [product(1, "Bolt", 0, 2)];
        view.apply(&snapshot(5, &low, None), false);
        assert!(view.apply(&snapshot(4, &[], Some("boom")), false).is_empty());
    }

    #[test]
    fn errors_print_once_and_static_mode_is_announced() {
        let mut view = WatchView::default();
        let mut first = snapshot(1, &[], None);
        first.live = false;
        assert_eq!(
            view.apply(&first, false),
            ["(live updates unavailable, showing a static list)"]
        );

        let mut failed = snapshot(2, &[], Some("fetch from products failed: offline"));
        failed.live = false;
        assert_eq!(
            view.apply(&failed, false),
            ["refresh failed: fetch from products failed: offline"]
        );
        failed.generation = 3;
        assert!(view.apply(&failed, false).is_empty());
    }

    #[tokio::test]
    async fn one_shot_listing_reads_the_store() {
        use stockroom_core::Record;
        use stockroom_test_utils::MemoryStore;

        let store = Arc::new(MemoryStore::with_records([Record::Product(product(
            1, "Bolt", 0, 2,
        ))]));
        run_notifications(store, &NotificationsConfig::default(), true, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn feed_rebuilds_on_writes_from_another_process() {
        use std::time::Duration;
        use stockroom_config::model::StorageConfig;
        use stockroom_core::RecordDraft;
        use stockroom_storage::SqliteStore;
        use stockroom_test_utils::fixtures::transaction_draft;

        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("watch.db").display().to_string(),
            wal_mode: true,
        };
        let watched = Arc::new(SqliteStore::open(&config).await.unwrap());
        let other = SqliteStore::open(&config).await.unwrap();
        other
            .insert(RecordDraft::Product(product(1, "Bolt", 9, 2)))
            .await
            .unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let feed = NotificationFeed::new(watched, Arc::new(SystemClock), &NotificationsConfig::default());
        let handle = feed
            .start(move |snapshot| {
                let _ = tx.send(snapshot.clone());
            })
            .await;
        let initial = rx.recv().await.unwrap();
        assert!(initial.live);
        assert!(initial.notifications.is_empty());

        other.insert(transaction_draft(1, 3, "2026-03-10")).await.unwrap();
        let rebuilt = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let snapshot = rx.recv().await.unwrap();
                if !snapshot.notifications.is_empty() {
                    return snapshot;
                }
            }
        })
        .await
        .expect("feed should pick up the other connection's commit");
        assert_eq!(rebuilt.notifications[0].id, "transaction-1");
        handle.stop().await;
    }
}
