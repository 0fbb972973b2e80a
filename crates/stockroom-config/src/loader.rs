// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stockroom.toml` > `~/.config/stockroom/stockroom.toml`
//! > `/etc/stockroom/stockroom.toml` with environment variable overrides via
//! the `STOCKROOM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StockroomConfig;

const SYSTEM_CONFIG: &str = "/etc/stockroom/stockroom.toml";
const LOCAL_CONFIG: &str = "stockroom.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stockroom/stockroom.toml` (system-wide)
/// 3. `~/.config/stockroom/stockroom.toml` (user XDG config)
/// 4. `./stockroom.toml` (local directory)
/// 5. `STOCKROOM_*` environment variables
pub fn load_config() -> Result<StockroomConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StockroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StockroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// `~/.config/stockroom/stockroom.toml`, when a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("stockroom").join("stockroom.toml"))
}

/// Candidate config file locations, lowest precedence first.
pub fn config_paths() -> Vec<std::path::PathBuf> {
    let mut paths = vec![std::path::PathBuf::from(SYSTEM_CONFIG)];
    paths.extend(user_config_path());
    paths.push(std::path::PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// keys survive: `STOCKROOM_NOTIFICATIONS_RECENT_TRANSACTION_LIMIT` maps to
/// `notifications.recent_transaction_limit`.
fn env_provider() -> Env {
    Env::prefixed("STOCKROOM_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ["app", "storage", "notifications", "auth"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
