// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived notification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use stockroom_core::{Product, Transaction};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LowStock,
    Transaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
}

/// The record a notification was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum NotificationSource {
    Product(Product),
    Transaction(Transaction),
}

/// An ephemeral, never-persisted summary of a low-stock condition or a
/// recent transaction.
///
/// The id is a stable composite of kind and source id, so the same source
/// yields the same id across rebuilds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub source: NotificationSource,
    pub timestamp: DateTime<Utc>,
}
