// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-stock detection and the notification feed.
//!
//! [`detect_low_stock`] and [`build_notifications`] are pure functions over
//! already-fetched records. [`NotificationFeed`] wires them to a
//! [`DataStore`](stockroom_core::DataStore) and keeps the list current from
//! the store's change feeds.

pub mod aggregator;
pub mod clock;
pub mod feed;
pub mod low_stock;
pub mod notification;
pub mod source;

pub use aggregator::build_notifications;
pub use clock::{Clock, FixedClock, SystemClock};
pub use feed::{FeedCallback, FeedHandle, FeedSnapshot, NotificationFeed};
pub use low_stock::{detect_low_stock, is_low_stock};
pub use notification::{Notification, NotificationKind, NotificationSource, Severity};
