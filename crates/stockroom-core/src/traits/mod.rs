// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The data store and the identity service are injected as trait objects;
//! nothing in the workspace reaches them through global state. All traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod collaborator;
pub mod identity;
pub mod store;

pub use collaborator::Collaborator;
pub use identity::{AuthCallback, AuthSubscription, IdentityService};
pub use store::DataStore;
