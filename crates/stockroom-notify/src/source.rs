// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed fetches backing the notification feed.

use stockroom_core::{DataStore, Product, Query, StockroomError, Table, Transaction};
use tracing::debug;

/// Fetch every product.
pub async fn fetch_products(store: &dyn DataStore) -> Result<Vec<Product>, StockroomError> {
    let rows = store.select(Table::Products, &Query::all()).await?;
    let products: Vec<Product> = rows.into_iter().filter_map(|r| r.into_product()).collect();
    debug!(count = products.len(), "fetched products");
    Ok(products)
}

/// Fetch the `limit` most recent transactions, newest first, with the
/// product name and sku joined on.
pub async fn fetch_recent_transactions(
    store: &dyn DataStore,
    limit: usize,
) -> Result<Vec<Transaction>, StockroomError> {
    let query = Query::all()
        .order_by("date", true)
        .limit(limit)
        .with_product();
    let rows = store.select(Table::Transactions, &query).await?;
    let transactions: Vec<Transaction> = rows
        .into_iter()
        .filter_map(|r| r.into_transaction())
        .collect();
    debug!(count = transactions.len(), limit, "fetched recent transactions");
    Ok(transactions)
}
