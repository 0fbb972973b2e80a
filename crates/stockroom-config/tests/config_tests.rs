// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Stockroom configuration system.

use stockroom_config::diagnostic::ConfigError;
use stockroom_config::model::StockroomConfig;
use stockroom_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_stockroom_config() {
    let toml = r#"
[app]
name = "warehouse-east"
log_level = "debug"

[storage]
database_path = "/tmp/stockroom-test.db"
wal_mode = false

[notifications]
recent_transaction_limit = 10

[auth]
min_password_length = 12
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "warehouse-east");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/stockroom-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.notifications.recent_transaction_limit, 10);
    assert_eq!(config.auth.min_password_length, 12);
}

/// Missing sections fall back to defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    assert_eq!(config.app.name, "stockroom");
    assert_eq!(config.app.log_level, "info");
    assert!(config.storage.wal_mode);
    assert_eq!(config.notifications.recent_transaction_limit, 5);
    assert_eq!(config.auth.min_password_length, 6);
}

/// A dotted override wins over TOML, the way `STOCKROOM_*` env vars do.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: StockroomConfig = Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::string("[notifications]\nrecent_transaction_limit = 3\n"))
        .merge(("notifications.recent_transaction_limit", 8))
        .extract()
        .expect("should merge override");

    assert_eq!(config.notifications.recent_transaction_limit, 8);
}

/// Unknown keys produce an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[notifications]
recent_transaction_limt = 3
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "recent_transaction_limt"
                && suggestion.as_deref() == Some("recent_transaction_limit")
                && valid_keys.contains("recent_transaction_limit")
        })
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Unknown top-level sections are rejected too.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[metrics]\nenabled = true\n")
        .expect_err("unknown section should fail");
    assert!(format!("{err}").contains("metrics"));
}

/// Wrong value types produce an InvalidType diagnostic.
#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[notifications]
recent_transaction_limit = "five"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after deserialization.
#[test]
fn load_and_validate_rejects_zero_limit() {
    let toml = r#"
[notifications]
recent_transaction_limit = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero limit is invalid");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("recent_transaction_limit")))
    );
}

/// ConfigError renders through miette.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::MissingKey {
        key: "storage.database_path".to_string(),
    };
    let diagnostic: &dyn Diagnostic = &error;
    assert!(diagnostic.code().is_some());

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, diagnostic)
        .expect("should render");
    assert!(buf.contains("storage.database_path"));
}

/// An explicit `--config` file is read and validated like the XDG hierarchy.
#[test]
fn load_and_validate_path_reads_the_given_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockroom.toml");
    std::fs::write(
        &path,
        "[storage]\ndatabase_path = \"/tmp/inventory.db\"\n\n[auth]\nmin_password_length = 10\n",
    )
    .unwrap();

    let config = load_and_validate_path(&path).expect("valid file");
    assert_eq!(config.storage.database_path, "/tmp/inventory.db");
    assert_eq!(config.auth.min_password_length, 10);

    std::fs::write(&path, "[auth]\nmin_pasword_length = 10\n").unwrap();
    let errors = load_and_validate_path(&path).expect_err("typo is rejected");
    assert!(!errors.is_empty());
}
