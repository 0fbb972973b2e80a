// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic add/edit form.
//!
//! Each table has a fixed field list. Raw string inputs are parsed into a
//! typed [`RecordDraft`], collecting every field error instead of stopping at
//! the first. Adding inserts; editing overwrites the row by its original key.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use stockroom_core::types::{SupplierDraft, TransactionDraft, UserDraft};
use stockroom_core::{DataStore, Product, Record, RecordDraft, StockroomError, Table, wire};

use crate::filter::display_cell;

/// How a field's raw input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
    Email,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
    }
}

const PRODUCT_FIELDS: &[FieldSpec] = &[
    field("id", "ID", FieldKind::Integer, true),
    field("name", "Name", FieldKind::Text, true),
    field("sku", "SKU", FieldKind::Text, true),
    field("quantity", "Quantity", FieldKind::Integer, true),
    field("price", "Price", FieldKind::Decimal, false),
    field("supplier_id", "Supplier ID", FieldKind::Integer, false),
    field("category", "Category", FieldKind::Text, false),
    field("min_stock_level", "Min Stock", FieldKind::Integer, false),
];

const SUPPLIER_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("address", "Address", FieldKind::Text, false),
    field("contact_person", "Contact Person", FieldKind::Text, false),
    field("contact_number", "Contact Number", FieldKind::Text, false),
    field("email", "Email", FieldKind::Email, false),
];

const TRANSACTION_FIELDS: &[FieldSpec] = &[
    field("id", "ID", FieldKind::Integer, false),
    field("product_id", "Product ID", FieldKind::Integer, true),
    field("quantity_sold", "Quantity Sold", FieldKind::Integer, true),
    field("date", "Date", FieldKind::Date, true),
    field("total", "Total", FieldKind::Decimal, true),
    field("user_id", "User ID", FieldKind::Text, false),
];

const USER_FIELDS: &[FieldSpec] = &[
    field("full_name", "Full Name", FieldKind::Text, false),
    field("email", "Email", FieldKind::Email, true),
    field("role", "Role", FieldKind::Text, false),
];

/// Editable fields of `table`, in form order.
pub fn fields(table: Table) -> &'static [FieldSpec] {
    match table {
        Table::Products => PRODUCT_FIELDS,
        Table::Suppliers => SUPPLIER_FIELDS,
        Table::Transactions => TRANSACTION_FIELDS,
        Table::Users => USER_FIELDS,
    }
}

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{label} is required")]
    Required { field: &'static str, label: &'static str },

    #[error("{label} must be a whole number")]
    NotInteger { field: &'static str, label: &'static str },

    #[error("{label} must be a number")]
    NotDecimal { field: &'static str, label: &'static str },

    #[error("{label} must be a date in YYYY-MM-DD format")]
    NotDate { field: &'static str, label: &'static str },

    #[error("{label} must be an email address")]
    NotEmail { field: &'static str, label: &'static str },

    #[error("{label} cannot be negative")]
    Negative { field: &'static str, label: &'static str },
}

impl FormError {
    /// The field name this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            FormError::Required { field, .. }
            | FormError::NotInteger { field, .. }
            | FormError::NotDecimal { field, .. }
            | FormError::NotDate { field, .. }
            | FormError::NotEmail { field, .. }
            | FormError::Negative { field, .. } => *field,
        }
    }
}

/// Why a submit did not reach or was refused by the store.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{} field(s) are invalid", .0.len())]
    Invalid(Vec<FormError>),

    #[error(transparent)]
    Store(#[from] StockroomError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    /// Editing the row stored under `id`.
    Edit { id: i64 },
}

/// Field-by-field parser that records every failure.
struct Inputs<'a> {
    table: Table,
    values: &'a BTreeMap<String, String>,
    errors: Vec<FormError>,
}

impl<'a> Inputs<'a> {
    fn spec(&self, name: &str) -> FieldSpec {
        fields(self.table)
            .iter()
            .copied()
            .find(|f| f.name == name)
            .unwrap_or(field("?", "?", FieldKind::Text, false))
    }

    /// Trimmed non-empty input, or `None` (recording `Required` if needed).
    fn raw(&mut self, name: &str) -> Option<&'a str> {
        let spec = self.spec(name);
        let values: &'a BTreeMap<String, String> = self.values;
        let value = values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());
        if value.is_none() && spec.required {
            self.errors.push(FormError::Required {
                field: spec.name,
                label: spec.label,
            });
        }
        value
    }

    fn text(&mut self, name: &str) -> Option<String> {
        self.raw(name).map(str::to_string)
    }

    fn email(&mut self, name: &str) -> Option<String> {
        let raw = self.raw(name)?;
        let valid = raw
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            let spec = self.spec(name);
            self.errors.push(FormError::NotEmail {
                field: spec.name,
                label: spec.label,
            });
            return None;
        }
        Some(raw.to_string())
    }

    fn integer(&mut self, name: &str) -> Option<i64> {
        let raw = self.raw(name)?;
        match raw.parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                let spec = self.spec(name);
                self.errors.push(FormError::NotInteger {
                    field: spec.name,
                    label: spec.label,
                });
                None
            }
        }
    }

    fn decimal(&mut self, name: &str) -> Option<f64> {
        let raw = self.raw(name)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                let spec = self.spec(name);
                self.errors.push(FormError::NotDecimal {
                    field: spec.name,
                    label: spec.label,
                });
                None
            }
        }
    }

    fn date(&mut self, name: &str) -> Option<NaiveDate> {
        let raw = self.raw(name)?;
        match wire::parse_date(raw) {
            Ok(date) => Some(date),
            Err(_) => {
                let spec = self.spec(name);
                self.errors.push(FormError::NotDate {
                    field: spec.name,
                    label: spec.label,
                });
                None
            }
        }
    }

    fn non_negative_integer(&mut self, name: &str) -> Option<i64> {
        let value = self.integer(name)?;
        self.non_negative(name, value)
    }

    fn non_negative<T: PartialOrd + Default>(&mut self, name: &str, value: T) -> Option<T> {
        if value < T::default() {
            let spec = self.spec(name);
            self.errors.push(FormError::Negative {
                field: spec.name,
                label: spec.label,
            });
            return None;
        }
        Some(value)
    }

    fn finish<T>(self, draft: Option<T>) -> Result<T, Vec<FormError>> {
        match draft {
            Some(draft) if self.errors.is_empty() => Ok(draft),
            _ => Err(self.errors),
        }
    }
}

/// Parse raw inputs for `table` into a draft.
pub fn parse_draft(
    table: Table,
    values: &BTreeMap<String, String>,
) -> Result<RecordDraft, Vec<FormError>> {
    let mut inputs = Inputs {
        table,
        values,
        errors: Vec::new(),
    };

    match table {
        Table::Products => {
            let id = inputs.integer("id");
            let name = inputs.text("name");
            let sku = inputs.text("sku");
            let quantity = inputs.non_negative_integer("quantity");
            let price = match inputs.decimal("price") {
                Some(p) => inputs.non_negative("price", p),
                None => None,
            };
            let supplier_id = inputs.integer("supplier_id");
            let category = inputs.text("category");
            let min_stock_level = inputs.non_negative_integer("min_stock_level");
            let draft = match (id, name, sku) {
                (Some(id), Some(name), Some(sku)) => Some(RecordDraft::Product(Product {
                    id,
                    name,
                    sku,
                    quantity,
                    price,
                    supplier_id,
                    category,
                    min_stock_level,
                    created_at: None,
                })),
                _ => None,
            };
            inputs.finish(draft)
        }
        Table::Suppliers => {
            let name = inputs.text("name");
            let address = inputs.text("address");
            let contact_person = inputs.text("contact_person");
            let contact_number = inputs.text("contact_number");
            let email = inputs.email("email");
            let draft = name.map(|name| {
                RecordDraft::Supplier(SupplierDraft {
                    name,
                    address,
                    contact_person,
                    contact_number,
                    email,
                })
            });
            inputs.finish(draft)
        }
        Table::Transactions => {
            let id = inputs.integer("id");
            let product_id = inputs.integer("product_id");
            let quantity_sold = inputs.integer("quantity_sold");
            let date = inputs.date("date");
            let total = inputs.decimal("total");
            let user_id = inputs.text("user_id");
            let draft = match (product_id, quantity_sold, date, total) {
                (Some(product_id), Some(quantity_sold), Some(date), Some(total)) => {
                    Some(RecordDraft::Transaction(TransactionDraft {
                        id,
                        product_id,
                        quantity_sold,
                        date,
                        total,
                        user_id,
                    }))
                }
                _ => None,
            };
            inputs.finish(draft)
        }
        Table::Users => {
            let full_name = inputs.text("full_name");
            let email = inputs.email("email");
            let role = inputs.text("role");
            let draft = email.map(|email| {
                RecordDraft::User(UserDraft {
                    full_name,
                    email,
                    role,
                })
            });
            inputs.finish(draft)
        }
    }
}

/// Initial input values for editing `record`.
pub fn prefill(record: &Record) -> BTreeMap<String, String> {
    fields(record.table())
        .iter()
        .map(|f| (f.name.to_string(), display_cell(record, f.name)))
        .collect()
}

/// State of an open add/edit form.
#[derive(Debug, Clone)]
pub struct RecordForm {
    table: Table,
    mode: FormMode,
    values: BTreeMap<String, String>,
}

impl RecordForm {
    pub fn add(table: Table) -> Self {
        Self {
            table,
            mode: FormMode::Add,
            values: BTreeMap::new(),
        }
    }

    pub fn edit(record: &Record) -> Self {
        Self {
            table: record.table(),
            mode: FormMode::Edit { id: record.id() },
            values: prefill(record),
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// "Add Product", "Edit Supplier", ...
    pub fn title(&self) -> String {
        let verb = match self.mode {
            FormMode::Add => "Add",
            FormMode::Edit { .. } => "Edit",
        };
        format!("{verb} {}", self.table.singular())
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        fields(self.table)
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn parse(&self) -> Result<RecordDraft, Vec<FormError>> {
        parse_draft(self.table, &self.values)
    }

    /// Validate and write the form through `store`.
    pub async fn submit(&self, store: &dyn DataStore) -> Result<Record, SubmitError> {
        let draft = self.parse().map_err(SubmitError::Invalid)?;
        let record = match self.mode {
            FormMode::Add => store.insert(draft).await?,
            FormMode::Edit { id } => store.update_by_key(self.table, id, draft).await?,
        };
        info!(table = %self.table, id = record.id(), mode = ?self.mode, "record saved");
        Ok(record)
    }
}
