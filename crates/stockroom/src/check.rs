// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom check` command implementation.
//!
//! Runs diagnostic checks against the configuration and the data store and
//! prints one line per check.

use std::time::{Duration, Instant};

use colored::Colorize;

use stockroom_config::StockroomConfig;
use stockroom_core::{Collaborator, DataStore, EventMask, HealthStatus, StockroomError, Table};
use stockroom_notify::detect_low_stock;
use stockroom_notify::source::fetch_products;
use stockroom_storage::SqliteStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run every check and print the report. Fails when any check failed.
pub async fn run_check(config: &StockroomConfig, use_color: bool) -> Result<(), StockroomError> {
    let mut results = vec![check_config(config)];

    let start = Instant::now();
    match SqliteStore::open(&config.storage).await {
        Ok(store) => {
            results.push(CheckResult::new(
                "Database",
                CheckStatus::Pass,
                format!("opened {}", config.storage.database_path),
                start,
            ));
            results.push(check_health(&store).await);
            results.push(check_change_feed(&store).await);
            results.push(check_stock(&store).await);
            store.close().await?;
        }
        Err(e) => results.push(CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start)),
    }

    println!();
    println!("  {} check", config.app.name);
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();

    let failed = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warned = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    if failed + warned == 0 {
        println!("  All checks passed.");
    } else {
        let issues = failed + warned;
        let word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {word} found.");
    }
    println!();

    if failed > 0 {
        return Err(StockroomError::Internal(format!("{failed} check(s) failed")));
    }
    Ok(())
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let ms = result.duration.as_millis();
    if use_color {
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({ms}ms)", result.name, result.message)
    }
}

/// The config was validated at startup; report what it resolved to.
fn check_config(config: &StockroomConfig) -> CheckResult {
    let start = Instant::now();
    CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!(
            "valid (feed shows {} recent transactions)",
            config.notifications.recent_transaction_limit
        ),
        start,
    )
}

async fn check_health(store: &dyn DataStore) -> CheckResult {
    let start = Instant::now();
    match store.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new("Store health", CheckStatus::Pass, "healthy", start),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("Store health", CheckStatus::Warn, format!("degraded: {reason}"), start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("Store health", CheckStatus::Fail, format!("unhealthy: {reason}"), start)
        }
        Err(e) => CheckResult::new("Store health", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Subscribe to both tables the notification feed follows, then release.
async fn check_change_feed(store: &dyn DataStore) -> CheckResult {
    let start = Instant::now();
    for table in [Table::Products, Table::Transactions] {
        if let Err(e) = store.subscribe(table, EventMask::ALL).await {
            return CheckResult::new(
                "Change feed",
                CheckStatus::Warn,
                format!("{e} (notifications will not update live)"),
                start,
            );
        }
    }
    CheckResult::new("Change feed", CheckStatus::Pass, "available", start)
}

async fn check_stock(store: &dyn DataStore) -> CheckResult {
    let start = Instant::now();
    match fetch_products(store).await {
        Ok(products) => {
            let low = detect_low_stock(&products).len();
            let status = if low == 0 { CheckStatus::Pass } else { CheckStatus::Warn };
            CheckResult::new(
                "Stock levels",
                status,
                format!("{low} of {} products below minimum", products.len()),
                start,
            )
        }
        Err(e) => CheckResult::new("Stock levels", CheckStatus::Fail, e.to_string(), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Record;
    use stockroom_test_utils::MemoryStore;
    use stockroom_test_utils::fixtures::product;

    #[tokio::test]
    async fn low_stock_is_a_warning() {
        let store = MemoryStore::with_records([
            Record::Product(product(1, "Bolt", 0, 2)),
            Record::Product(product(2, "Nut", 9, 2)),
        ]);
        let result = check_stock(&store).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.message, "1 of 2 products below minimum");
    }

    #[tokio::test]
    async fn unavailable_change_feed_is_a_warning() {
        let store = MemoryStore::new();
        assert_eq!(check_change_feed(&store).await.status, CheckStatus::Pass);
        assert_eq!(store.subscriber_count(), 0);

        store.fail_subscribe(Table::Transactions, true);
        let result = check_change_feed(&store).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn failing_select_fails_the_stock_check() {
        let store = MemoryStore::new();
        store.fail_selects(Table::Products, true);
        assert_eq!(check_stock(&store).await.status, CheckStatus::Fail);
    }

    #[test]
    fn plain_lines_are_tagged() {
        let result = CheckResult {
            name: "Database",
            status: CheckStatus::Fail,
            message: "locked".into(),
            duration: Duration::from_millis(3),
        };
        assert_eq!(
            format_result(&result, false),
            "    [FAIL] Database             locked (3ms)"
        );
    }

    #[tokio::test]
    async fn full_check_against_a_temp_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StockroomConfig::default();
        config.storage.database_path = dir.path().join("check.db").display().to_string();
        run_check(&config, false).await.unwrap();
    }
}
