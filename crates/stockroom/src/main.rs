// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stockroom - inventory admin with low-stock alerts.
//!
//! This is the binary entry point. Every command opens the SQLite store named
//! by the configuration and works through the same admin and notification
//! crates a graphical front end would use.

mod browse;
mod check;
mod render;
mod watch;

use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use stockroom_config::StockroomConfig;
use stockroom_core::{StockroomError, Table};
use stockroom_storage::SqliteStore;

/// Stockroom - inventory admin with low-stock alerts.
#[derive(Parser, Debug)]
#[command(name = "stockroom", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the tables and their row counts.
    Tables,
    /// Show the rows of a table.
    List {
        /// products, suppliers, transactions, or users.
        table: Table,
        /// Keep only rows with a cell containing this text (case-insensitive).
        #[arg(long, short)]
        search: Option<String>,
        /// Print rows as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a row from `field=value` pairs.
    Add {
        table: Table,
        #[arg(value_name = "FIELD=VALUE")]
        values: Vec<String>,
    },
    /// Change fields of an existing row; unspecified fields keep their value.
    Edit {
        table: Table,
        id: i64,
        #[arg(value_name = "FIELD=VALUE")]
        values: Vec<String>,
    },
    /// Delete a row by id.
    Delete {
        table: Table,
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show products below their minimum stock level.
    LowStock,
    /// Print the current notifications once.
    Notifications {
        /// Number of recent transactions to include (at least 1).
        #[arg(long)]
        limit: Option<NonZeroUsize>,
        /// Print notifications as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Follow the notification feed until Ctrl+C.
    Watch,
    /// Check the configuration and the data store.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => stockroom_config::load_and_validate_path(path),
        None => stockroom_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            stockroom_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);
    let use_color = !cli.plain && std::io::stdout().is_terminal();

    let Some(command) = cli.command else {
        println!("{}: use --help for available commands", config.app.name);
        return;
    };

    if let Err(e) = run(command, &config, use_color).await {
        if use_color {
            eprintln!("{} {e}", "error:".red().bold());
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    config: &StockroomConfig,
    use_color: bool,
) -> Result<(), StockroomError> {
    match command {
        Commands::Check => check::run_check(config, use_color).await,
        Commands::Tables => with_store(config, browse::run_tables).await,
        Commands::List {
            table,
            search,
            json,
        } => {
            with_store(config, move |store| async move {
                browse::run_list(store, table, search.as_deref(), json, use_color).await
            })
            .await
        }
        Commands::Add { table, values } => {
            with_store(config, move |store| async move {
                browse::run_add(store.as_ref(), table, &values).await
            })
            .await
        }
        Commands::Edit { table, id, values } => {
            with_store(config, move |store| async move {
                browse::run_edit(store, table, id, &values).await
            })
            .await
        }
        Commands::Delete { table, id, yes } => {
            with_store(config, move |store| browse::run_delete(store, table, id, yes)).await
        }
        Commands::LowStock => {
            with_store(config, move |store| async move {
                browse::run_low_stock(store.as_ref(), use_color).await
            })
            .await
        }
        Commands::Notifications { limit, json } => {
            let mut notifications = config.notifications.clone();
            if let Some(limit) = limit {
                notifications.recent_transaction_limit = limit.get();
            }
            with_store(config, move |store| async move {
                watch::run_notifications(store, &notifications, json, use_color).await
            })
            .await
        }
        Commands::Watch => {
            let notifications = config.notifications.clone();
            with_store(config, move |store| async move {
                watch::run_watch(store, &notifications, use_color).await
            })
            .await
        }
    }
}

/// Open the configured store, run `command` against it, then checkpoint and
/// close it whatever the outcome.
async fn with_store<F, Fut>(config: &StockroomConfig, command: F) -> Result<(), StockroomError>
where
    F: FnOnce(Arc<SqliteStore>) -> Fut,
    Fut: Future<Output = Result<(), StockroomError>>,
{
    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let result = command(Arc::clone(&store)).await;
    store.close().await?;
    result
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockroom={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = stockroom_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.app.name, "stockroom");
    }

    #[test]
    fn cli_parses_table_names() {
        let cli = Cli::parse_from(["stockroom", "list", "transactions", "--search", "widget"]);
        match cli.command {
            Some(Commands::List { table, search, .. }) => {
                assert_eq!(table, Table::Transactions);
                assert_eq!(search.as_deref(), Some("widget"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["stockroom", "list", "widgets"]).is_err());
    }

    #[test]
    fn cli_collects_field_assignments() {
        let cli = Cli::parse_from([
            "stockroom", "--plain", "add", "products", "id=7", "name=Bolt", "sku=B-7", "quantity=3",
        ]);
        assert!(cli.plain);
        match cli.command {
            Some(Commands::Add { table, values }) => {
                assert_eq!(table, Table::Products);
                assert_eq!(values.len(), 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn notification_limit_must_be_positive() {
        let cli = Cli::parse_from(["stockroom", "notifications", "--limit", "3"]);
        match cli.command {
            Some(Commands::Notifications { limit, .. }) => {
                assert_eq!(limit.map(NonZeroUsize::get), Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["stockroom", "notifications", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["stockroom", "notifications", "--limit", "-2"]).is_err());
    }
}
