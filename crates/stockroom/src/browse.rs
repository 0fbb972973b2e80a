// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table commands: `tables`, `list`, `add`, `edit`, `delete`, `low-stock`.

use std::io::{BufRead, Write};
use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use stockroom_admin::{RecordForm, SubmitError, TableBrowser};
use stockroom_core::{DataStore, Query, StockroomError, Table};
use stockroom_notify::detect_low_stock;
use stockroom_notify::source::fetch_products;

use crate::render::render_rows;

/// Print every table with its row count.
pub async fn run_tables<S: DataStore + 'static>(store: Arc<S>) -> Result<(), StockroomError> {
    for &table in TableBrowser::tables() {
        let count = store.select(table, &Query::all()).await?.len();
        println!("{:<14}{count:>6}", table.label());
    }
    Ok(())
}

pub async fn run_list<S: DataStore + 'static>(
    store: Arc<S>,
    table: Table,
    search: Option<&str>,
    json: bool,
    use_color: bool,
) -> Result<(), StockroomError> {
    let mut browser = TableBrowser::new(store, table);
    browser.reload().await?;
    if let Some(search) = search {
        browser.set_search(search);
    }
    let rows = browser.visible_rows();

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| StockroomError::Internal(format!("failed to encode rows: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    print!("{}", render_rows(table, &rows, use_color));
    println!("({} of {} rows)", rows.len(), browser.rows().len());
    Ok(())
}

/// Split `FIELD=VALUE` arguments and check each field exists on the form.
fn apply_assignments(
    form: &mut RecordForm,
    assignments: &[String],
) -> Result<(), StockroomError> {
    let table = form.table();
    for assignment in assignments {
        let Some((field, value)) = assignment.split_once('=') else {
            return Err(StockroomError::Validation {
                table,
                message: format!("expected FIELD=VALUE, got `{assignment}`"),
            });
        };
        let field = field.trim();
        if !form.fields().iter().any(|f| f.name == field) {
            let known: Vec<&str> = form.fields().iter().map(|f| f.name).collect();
            return Err(StockroomError::Validation {
                table,
                message: format!("unknown field `{field}` (expected one of: {})", known.join(", ")),
            });
        }
        form.set(field, value);
    }
    Ok(())
}

async fn submit(form: &RecordForm, store: &dyn DataStore) -> Result<(), StockroomError> {
    match form.submit(store).await {
        Ok(record) => {
            println!("{}: saved {} {}", form.title(), record.table().singular(), record.id());
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => Err(StockroomError::Validation {
            table: form.table(),
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }),
        Err(SubmitError::Store(e)) => Err(e),
    }
}

pub async fn run_add(
    store: &dyn DataStore,
    table: Table,
    assignments: &[String],
) -> Result<(), StockroomError> {
    let mut form = RecordForm::add(table);
    apply_assignments(&mut form, assignments)?;
    submit(&form, store).await
}

/// Prefill the form from the stored row, then overwrite the given fields.
pub async fn run_edit<S: DataStore + 'static>(
    store: Arc<S>,
    table: Table,
    id: i64,
    assignments: &[String],
) -> Result<(), StockroomError> {
    let mut browser = TableBrowser::new(store.clone(), table);
    browser.reload().await?;
    let record = browser
        .find(id)
        .ok_or(StockroomError::NotFound { table, id })?;
    let mut form = RecordForm::edit(record);
    apply_assignments(&mut form, assignments)?;
    submit(&form, store.as_ref()).await
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub async fn run_delete<S: DataStore + 'static>(
    store: Arc<S>,
    table: Table,
    id: i64,
    yes: bool,
) -> Result<(), StockroomError> {
    if !yes && !confirm(&format!("Delete {} {id}?", table.singular().to_lowercase())) {
        println!("Cancelled.");
        return Ok(());
    }
    let mut browser = TableBrowser::new(store, table);
    browser.delete(id).await?;
    info!(%table, id, remaining = browser.rows().len(), "deleted from cli");
    println!("Deleted {} {id}.", table.singular().to_lowercase());
    Ok(())
}

pub async fn run_low_stock(store: &dyn DataStore, use_color: bool) -> Result<(), StockroomError> {
    let products = fetch_products(store).await?;
    let low = detect_low_stock(&products);
    if low.is_empty() {
        println!("All products are at or above their minimum stock level.");
        return Ok(());
    }
    for product in &low {
        let level = format!(
            "{}/{}",
            product.quantity.unwrap_or_default(),
            product.min_stock_level.unwrap_or_default()
        );
        let level = if use_color {
            level.yellow().bold().to_string()
        } else {
            level
        };
        println!("{:<6}{:<24}{:<14}{level}", product.id, product.name, product.sku);
    }
    println!("({} low on stock)", low.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Record;
    use stockroom_test_utils::MemoryStore;
    use stockroom_test_utils::fixtures::product;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn assignments_reject_unknown_fields_and_bad_syntax() {
        let mut form = RecordForm::add(Table::Suppliers);
        let err = apply_assignments(&mut form, &args(&["nme=Acme"])).unwrap_err();
        assert!(err.to_string().contains("unknown field `nme`"));

        let err = apply_assignments(&mut form, &args(&["name"])).unwrap_err();
        assert!(err.to_string().contains("FIELD=VALUE"));

        apply_assignments(&mut form, &args(&["name=Acme=Corp"])).unwrap();
        assert_eq!(form.value("name"), "Acme=Corp");
    }

    #[tokio::test]
    async fn add_reports_every_invalid_field() {
        let store = MemoryStore::new();
        let err = run_add(&store, Table::Products, &args(&["name=Bolt", "quantity=many"]))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ID is required"), "{message}");
        assert!(message.contains("Quantity must be a whole number"), "{message}");
        assert!(store.rows(Table::Products).is_empty());
    }

    #[tokio::test]
    async fn edit_keeps_unspecified_fields() {
        let store = Arc::new(MemoryStore::with_records([Record::Product(product(
            4, "Bolt", 12, 5,
        ))]));
        run_edit(store.clone(), Table::Products, 4, &args(&["quantity=2"]))
            .await
            .unwrap();
        let stored = store.rows(Table::Products).remove(0).into_product().unwrap();
        assert_eq!(stored.quantity, Some(2));
        assert_eq!(stored.name, "Bolt");
        assert_eq!(stored.min_stock_level, Some(5));

        let err = run_edit(store, Table::Products, 99, &[]).await.unwrap_err();
        assert!(matches!(err, StockroomError::NotFound { id: 99, .. }));
    }

    #[tokio::test]
    async fn delete_with_yes_skips_the_prompt() {
        let store = Arc::new(MemoryStore::with_records([Record::Product(product(
            4, "Bolt", 12, 5,
        ))]));
        run_delete(store.clone(), Table::Products, 4, true).await.unwrap();
        assert!(store.rows(Table::Products).is_empty());
    }
}
