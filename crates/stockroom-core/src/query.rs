// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter specifications for `DataStore::select`.

use std::cmp::Ordering;

use crate::types::{ColumnValue, Record, Table};

/// An equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: ColumnValue,
}

/// Sort order for a select.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

/// A select specification: equality filters, optional ordering and limit,
/// and an optional product join for transaction rows.
///
/// The default query selects every row of the table in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub with_product: bool,
}

impl Query {
    /// Select every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order_by = Some(OrderBy {
            column: column.into(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Join the product name and sku onto transaction rows.
    pub fn with_product(mut self) -> Self {
        self.with_product = true;
        self
    }

    /// Returns the first column this query names that `table` does not have.
    pub fn unknown_column(&self, table: Table) -> Option<&str> {
        self.filters
            .iter()
            .map(|f| f.column.as_str())
            .chain(self.order_by.iter().map(|o| o.column.as_str()))
            .find(|column| !table.has_column(column))
    }

    /// Whether `record` passes every equality filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|f| record.column(&f.column).as_ref() == Some(&f.value))
    }

    /// Apply filters, ordering and limit to an in-memory row set.
    ///
    /// NULLs sort last in both directions. Rows with equal keys fall back to
    /// key order in the same direction, so a descending select lists the
    /// newest key first among ties.
    pub fn apply(&self, rows: Vec<Record>) -> Vec<Record> {
        let mut rows: Vec<Record> = rows.into_iter().filter(|r| self.matches(r)).collect();
        if let Some(order) = &self.order_by {
            rows.sort_by(|a, b| {
                let ord = match (a.column(&order.column), b.column(&order.column)) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => return Ordering::Greater,
                    (Some(_), None) => return Ordering::Less,
                    (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                };
                let ord = ord.then_with(|| a.id().cmp(&b.id()));
                if order.descending { ord.reverse() } else { ord }
            });
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn product(id: i64, name: &str, quantity: Option<i64>) -> Record {
        Record::Product(Product {
            id,
            name: name.into(),
            sku: format!("SKU-{id}"),
            quantity,
            ..Default::default()
        })
    }

    #[test]
    fn default_query_keeps_everything_in_order() {
        let rows = vec![product(2, "b", Some(1)), product(1, "a", Some(2))];
        let out = Query::all().apply(rows.clone());
        assert_eq!(out, rows);
    }

    #[test]
    fn equality_filter_and_limit() {
        let rows = vec![
            product(1, "a", Some(5)),
            product(2, "b", Some(5)),
            product(3, "c", Some(7)),
        ];
        let out = Query::all().eq("quantity", 5).limit(1).apply(rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id(), 1);
    }

    #[test]
    fn descending_order_puts_nulls_last() {
        let rows = vec![
            product(1, "a", None),
            product(2, "b", Some(3)),
            product(3, "c", Some(9)),
        ];
        let ids: Vec<i64> = Query::all()
            .order_by("quantity", true)
            .apply(rows)
            .iter()
            .map(Record::id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn ties_fall_back_to_key_in_the_sort_direction() {
        let rows = vec![
            product(1, "a", Some(4)),
            product(2, "b", Some(4)),
            product(3, "c", Some(4)),
            product(4, "d", None),
        ];
        let desc: Vec<i64> = Query::all()
            .order_by("quantity", true)
            .limit(2)
            .apply(rows.clone())
            .iter()
            .map(Record::id)
            .collect();
        assert_eq!(desc, vec![3, 2]);

        let asc: Vec<i64> = Query::all()
            .order_by("quantity", false)
            .apply(rows)
            .iter()
            .map(Record::id)
            .collect();
        assert_eq!(asc, vec![1, 2, 3, 4]);
    }

    #[test]
    fn unknown_columns_are_reported() {
        let q = Query::all().eq("quantity", 1).order_by("bogus", false);
        assert_eq!(q.unknown_column(Table::Products), Some("bogus"));
        assert_eq!(Query::all().unknown_column(Table::Users), None);
    }
}
