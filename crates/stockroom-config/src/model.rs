// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Stockroom.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Stockroom configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StockroomConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Local data store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification feed settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Account settings policy.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name shown in CLI output.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "stockroom".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Local SQLite store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("stockroom").join("stockroom.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("stockroom.db"))
        .display()
        .to_string()
}

fn default_true() -> bool {
    true
}

/// Notification feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    /// How many of the most recent transactions appear in the feed.
    #[serde(default = "default_recent_transaction_limit")]
    pub recent_transaction_limit: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            recent_transaction_limit: default_recent_transaction_limit(),
        }
    }
}

fn default_recent_transaction_limit() -> usize {
    5
}

/// Account settings policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Minimum length accepted for a new password.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_min_password_length() -> usize {
    6
}
