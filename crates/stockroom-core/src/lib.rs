// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Stockroom.
//!
//! This crate provides the record types, the data store and identity service
//! traits, change-feed plumbing, and the error type used throughout the
//! workspace. Store and identity implementations implement traits defined here.

pub mod change;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;
pub mod wire;

// Re-export key items at crate root for ergonomic imports.
pub use change::{
    ChangeEvent, ChangeHub, ChangeKind, ChangeSubscription, EventMask, SubscriptionGuard,
};
pub use error::StockroomError;
pub use query::Query;
pub use types::{
    AuthEvent, AuthUser, HealthStatus, Product, ProductSummary, Record, RecordDraft, Supplier,
    Table, Transaction, User,
};

pub use traits::{AuthCallback, AuthSubscription, Collaborator, DataStore, IdentityService};
