// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Stockroom integration tests.
//!
//! Provides in-memory collaborators and record builders for fast,
//! deterministic tests without a database or a live identity provider.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory data store with change feeds and failure injection
//! - [`MockIdentity`] - Identity service over an in-memory account map
//! - [`fixtures`] - Builders for products, transactions, and drafts

pub mod fixtures;
pub mod memory_store;
pub mod mock_identity;

pub use memory_store::MemoryStore;
pub use mock_identity::MockIdentity;
