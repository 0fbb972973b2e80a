// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merges low-stock hits and recent transactions into one time-ordered feed.
//!
//! Low-stock notifications describe current state and are stamped with the
//! injected "now"; transaction notifications use the start of the
//! transaction's calendar date. The merged list is sorted newest first with
//! a stable sort, so entries with equal timestamps keep concatenation order:
//! low-stock entries (in product order) before transactions (in the order the
//! store returned them).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use stockroom_core::{Product, Transaction, wire};

use crate::low_stock::detect_low_stock;
use crate::notification::{Notification, NotificationKind, NotificationSource, Severity};

/// Product name used when a transaction's product cannot be resolved.
pub const UNKNOWN_PRODUCT: &str = "Product";

/// Build the notification feed.
///
/// `recent_transactions` is expected to already be the K most recent
/// transactions; this function does not limit or re-fetch. Product names for
/// transactions resolve from the joined summary first, then from `products`,
/// then fall back to [`UNKNOWN_PRODUCT`].
pub fn build_notifications(
    products: &[Product],
    recent_transactions: &[Transaction],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let names: HashMap<i64, &str> = products.iter().map(|p| (p.id, p.name.as_str())).collect();

    let mut notifications: Vec<Notification> = detect_low_stock(products)
        .into_iter()
        .map(|product| low_stock_notification(product, now))
        .collect();

    notifications.extend(recent_transactions.iter().map(|tx| {
        let name = tx
            .product
            .as_ref()
            .map(|p| p.name.as_str())
            .or_else(|| names.get(&tx.product_id).copied())
            .unwrap_or(UNKNOWN_PRODUCT);
        transaction_notification(tx, name)
    }));

    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    notifications
}

fn low_stock_notification(product: Product, now: DateTime<Utc>) -> Notification {
    // Only products with both values present reach this point.
    let quantity = product.quantity.unwrap_or_default();
    let threshold = product.min_stock_level.unwrap_or_default();
    Notification {
        id: format!("low-stock-{}", product.id),
        kind: NotificationKind::LowStock,
        title: "Low Stock Alert".to_string(),
        message: format!(
            "{} is below minimum level ({quantity}/{threshold})",
            product.name
        ),
        severity: Severity::Warning,
        source: NotificationSource::Product(product),
        timestamp: now,
    }
}

fn transaction_notification(tx: &Transaction, product_name: &str) -> Notification {
    Notification {
        id: format!("transaction-{}", tx.id),
        kind: NotificationKind::Transaction,
        title: "New Transaction".to_string(),
        message: format!(
            "{product_name} - {} units sold for ${:.2}",
            tx.quantity_sold, tx.total
        ),
        severity: Severity::Info,
        source: NotificationSource::Transaction(tx.clone()),
        timestamp: wire::start_of_day(tx.date),
    }
}
