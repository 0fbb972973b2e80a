// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::StockroomConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &StockroomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.trim().to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.notifications.recent_transaction_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "notifications.recent_transaction_limit must be at least 1".to_string(),
        });
    }

    if config.auth.min_password_length == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.min_password_length must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&StockroomConfig::default()).is_ok());
    }

    #[test]
    fn zero_recent_limit_fails_validation() {
        let mut config = StockroomConfig::default();
        config.notifications.recent_transaction_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "recent_transaction_limit"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = StockroomConfig::default();
        config.storage.database_path = "  ".to_string();
        config.app.log_level = "loud".to_string();
        config.auth.min_password_length = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "database_path"));
        assert!(has_message(&errors, "log_level"));
        assert!(has_message(&errors, "min_password_length"));
    }
}
