// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin panel state for Stockroom.
//!
//! Everything here is presentation-agnostic: the browser, form, auth state,
//! and notification panel hold the data a front end renders and call the
//! injected collaborators for every read and write.

pub mod auth;
pub mod browser;
pub mod filter;
pub mod form;
pub mod panel;

pub use auth::{AuthState, PasswordChange, PasswordError};
pub use browser::TableBrowser;
pub use form::{FieldKind, FieldSpec, FormError, FormMode, RecordForm, SubmitError};
pub use panel::NotificationPanel;
