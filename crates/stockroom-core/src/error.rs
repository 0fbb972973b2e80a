// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Stockroom.

use thiserror::Error;

use crate::types::Table;

/// The primary error type used across collaborator traits and core operations.
///
/// None of these are fatal to the process: every failure is local to the
/// operation that produced it and can be retried.
#[derive(Debug, Error)]
pub enum StockroomError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The data store was unreachable or rejected a query.
    #[error("fetch from {table} failed: {message}")]
    Fetch {
        table: Table,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors outside of a single select (connection, migration, write).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A change-feed subscription could not be established.
    #[error("subscription to {table} failed: {message}")]
    Subscription { table: Table, message: String },

    /// The identity service rejected the request or was unavailable.
    #[error("authentication error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record failed validation before it reached the store.
    #[error("invalid {table} record: {message}")]
    Validation { table: Table, message: String },

    /// No record exists under the given key.
    #[error("{table} record {id} not found")]
    NotFound { table: Table, id: i64 },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StockroomError {
    /// Shorthand for a `Fetch` error without an underlying source.
    pub fn fetch(table: Table, message: impl Into<String>) -> Self {
        Self::Fetch {
            table,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for an `Auth` error without an underlying source.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            source: None,
        }
    }
}
