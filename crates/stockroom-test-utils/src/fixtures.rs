// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record builders for tests.

use chrono::{DateTime, NaiveDate, Utc};

use stockroom_core::types::TransactionDraft;
use stockroom_core::{Product, ProductSummary, RecordDraft, Transaction};

/// Parse a `YYYY-MM-DD` literal. Panics on malformed input.
pub fn date(s: &str) -> NaiveDate {
    stockroom_core::wire::parse_date(s).unwrap_or_else(|e| panic!("bad test date {s:?}: {e}"))
}

/// Parse an RFC 3339 literal. Panics on malformed input.
pub fn instant(s: &str) -> DateTime<Utc> {
    stockroom_core::wire::parse_instant(s).unwrap_or_else(|e| panic!("bad test instant {s:?}: {e}"))
}

/// A product with a quantity and a threshold.
pub fn product(id: i64, name: &str, quantity: i64, min_stock_level: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        sku: format!("SKU-{id:03}"),
        quantity: Some(quantity),
        price: Some(9.99),
        min_stock_level: Some(min_stock_level),
        ..Default::default()
    }
}

/// A stored transaction, optionally carrying the joined product summary.
pub fn transaction(
    id: i64,
    product_id: i64,
    quantity_sold: i64,
    on: &str,
    total: f64,
    product_name: Option<&str>,
) -> Transaction {
    Transaction {
        id,
        product_id,
        quantity_sold,
        date: date(on),
        total,
        user_id: None,
        product: product_name.map(|name| ProductSummary {
            name: name.to_string(),
            sku: format!("SKU-{product_id:03}"),
        }),
    }
}

/// A transaction insert payload with a store-assigned key.
pub fn transaction_draft(product_id: i64, quantity_sold: i64, on: &str) -> RecordDraft {
    RecordDraft::Transaction(TransactionDraft {
        id: None,
        product_id,
        quantity_sold,
        date: date(on),
        total: quantity_sold as f64 * 9.99,
        user_id: None,
    })
}
