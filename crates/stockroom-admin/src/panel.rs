// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification panel: the view-side state for a notification feed.

use std::collections::HashSet;

use tracing::debug;

use stockroom_notify::{FeedSnapshot, Notification};

/// Latest applied snapshot plus local dismiss and read state.
///
/// Dismissing is local only. A dismissed id stays hidden while it keeps
/// appearing in snapshots; once a snapshot no longer contains it, the
/// dismissal is forgotten so a recurring alert shows again.
#[derive(Debug, Default)]
pub struct NotificationPanel {
    generation: u64,
    notifications: Vec<Notification>,
    error: Option<String>,
    live: bool,
    dismissed: HashSet<String>,
    read: HashSet<String>,
}

impl NotificationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `snapshot` unless it is older than the one already shown.
    /// Returns whether it was applied.
    pub fn apply(&mut self, snapshot: &FeedSnapshot) -> bool {
        if snapshot.generation <= self.generation {
            debug!(
                generation = snapshot.generation,
                current = self.generation,
                "stale notification snapshot dropped"
            );
            return false;
        }
        self.generation = snapshot.generation;
        self.notifications = snapshot.notifications.clone();
        self.error = snapshot.error.clone();
        self.live = snapshot.live;

        let present: HashSet<&str> = self.notifications.iter().map(|n| n.id.as_str()).collect();
        self.dismissed.retain(|id| present.contains(id.as_str()));
        self.read.retain(|id| present.contains(id.as_str()));
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Notifications not dismissed, newest first.
    pub fn visible(&self) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| !self.dismissed.contains(&n.id))
            .collect()
    }

    /// Hide one notification. Returns `false` if it is not shown.
    pub fn dismiss(&mut self, id: &str) -> bool {
        if !self.visible().iter().any(|n| n.id == id) {
            return false;
        }
        self.dismissed.insert(id.to_string())
    }

    pub fn dismiss_all(&mut self) {
        let ids: Vec<String> = self.notifications.iter().map(|n| n.id.clone()).collect();
        self.dismissed.extend(ids);
    }

    pub fn mark_all_read(&mut self) {
        let ids: Vec<String> = self.visible().iter().map(|n| n.id.clone()).collect();
        self.read.extend(ids);
    }

    pub fn unread_count(&self) -> usize {
        self.visible()
            .iter()
            .filter(|n| !self.read.contains(&n.id))
            .count()
    }

    /// Error from the latest rebuild; the list then shows the previous result.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}
