// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared by the data store, the notification core, and the admin surface.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::wire;

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Collaborator is fully operational.
    Healthy,
    /// Collaborator is operational but experiencing issues.
    Degraded(String),
    /// Collaborator is not operational.
    Unhealthy(String),
}

/// The tables exposed by the data store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Products,
    Suppliers,
    Transactions,
    Users,
}

/// Who assigns the primary key when a row is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// The caller must supply the key.
    Caller,
    /// The store always assigns the key.
    Store,
    /// The store assigns the key unless the caller supplies one.
    StoreUnlessSupplied,
}

impl Table {
    /// All tables in sidebar order.
    pub const ALL: [Table; 4] = [
        Table::Products,
        Table::Suppliers,
        Table::Transactions,
        Table::Users,
    ];

    /// Human-readable plural label.
    pub fn label(self) -> &'static str {
        match self {
            Table::Products => "Products",
            Table::Suppliers => "Suppliers",
            Table::Transactions => "Transactions",
            Table::Users => "Users",
        }
    }

    /// Human-readable singular label, used in form titles.
    pub fn singular(self) -> &'static str {
        match self {
            Table::Products => "Product",
            Table::Suppliers => "Supplier",
            Table::Transactions => "Transaction",
            Table::Users => "User",
        }
    }

    /// Column names in display order. The first column is always the key.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Products => &[
                "id",
                "name",
                "sku",
                "quantity",
                "price",
                "supplier_id",
                "category",
                "min_stock_level",
                "created_at",
            ],
            Table::Suppliers => &[
                "id",
                "name",
                "address",
                "contact_person",
                "contact_number",
                "email",
                "created_at",
            ],
            Table::Transactions => &[
                "id",
                "product_id",
                "quantity_sold",
                "date",
                "total",
                "user_id",
            ],
            Table::Users => &["id", "full_name", "email", "role", "created_at"],
        }
    }

    /// Whether `column` names a real column of this table.
    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    pub fn key_policy(self) -> KeyPolicy {
        match self {
            Table::Products => KeyPolicy::Caller,
            Table::Suppliers | Table::Users => KeyPolicy::Store,
            Table::Transactions => KeyPolicy::StoreUnlessSupplied,
        }
    }
}

/// A product row.
///
/// `quantity` and `min_stock_level` are nullable at the store level and are
/// mutated independently; a product sitting below its threshold is a normal
/// state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The joined summary carried on transactions.
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            name: self.name.clone(),
            sku: self.sku.clone(),
        }
    }
}

/// Product columns joined onto a transaction when the query asks for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub sku: String,
}

/// A sales transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub product_id: i64,
    pub quantity_sold: i64,
    pub date: NaiveDate,
    pub total: f64,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Present only when the select requested the product join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
}

/// A supplier row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A staff profile row in the `users` table.
///
/// Credentials never live here; they belong to the identity service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert/update payload for a supplier. The store assigns the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
}

/// Insert/update payload for a transaction. `id` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub id: Option<i64>,
    pub product_id: i64,
    pub quantity_sold: i64,
    pub date: NaiveDate,
    pub total: f64,
    pub user_id: Option<String>,
}

/// Insert/update payload for a staff profile. The store assigns the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub full_name: Option<String>,
    pub email: String,
    pub role: Option<String>,
}

/// A row from any table, tagged by the table it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum Record {
    Product(Product),
    Supplier(Supplier),
    Transaction(Transaction),
    User(User),
}

/// A write payload for any table, tagged by the target table.
///
/// Products carry their caller-assigned key; transactions may carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum RecordDraft {
    Product(Product),
    Supplier(SupplierDraft),
    Transaction(TransactionDraft),
    User(UserDraft),
}

impl RecordDraft {
    pub fn table(&self) -> Table {
        match self {
            RecordDraft::Product(_) => Table::Products,
            RecordDraft::Supplier(_) => Table::Suppliers,
            RecordDraft::Transaction(_) => Table::Transactions,
            RecordDraft::User(_) => Table::Users,
        }
    }

    /// The key carried by the payload itself, if any.
    pub fn supplied_key(&self) -> Option<i64> {
        match self {
            RecordDraft::Product(p) => Some(p.id),
            RecordDraft::Transaction(t) => t.id,
            RecordDraft::Supplier(_) | RecordDraft::User(_) => None,
        }
    }

    /// Materialize the payload as a stored row keyed by `id`.
    ///
    /// `created_at` fills the timestamp for tables that have one, unless a
    /// product payload already carries its own.
    pub fn into_record(self, id: i64, created_at: Option<DateTime<Utc>>) -> Record {
        match self {
            RecordDraft::Product(p) => Record::Product(Product {
                id,
                created_at: p.created_at.or(created_at),
                ..p
            }),
            RecordDraft::Supplier(s) => Record::Supplier(Supplier {
                id,
                name: s.name,
                address: s.address,
                contact_person: s.contact_person,
                contact_number: s.contact_number,
                email: s.email,
                created_at,
            }),
            RecordDraft::Transaction(t) => Record::Transaction(Transaction {
                id,
                product_id: t.product_id,
                quantity_sold: t.quantity_sold,
                date: t.date,
                total: t.total,
                user_id: t.user_id,
                product: None,
            }),
            RecordDraft::User(u) => Record::User(User {
                id,
                full_name: u.full_name,
                email: u.email,
                role: u.role,
                created_at,
            }),
        }
    }
}

/// A scalar column value, used for equality filters and ordering.
#[derive(Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Int(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Real(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl std::fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnValue::Int(v) => write!(f, "{v}"),
            ColumnValue::Real(v) => write!(f, "{v}"),
            ColumnValue::Text(v) => f.write_str(v),
        }
    }
}

fn text(value: &Option<String>) -> Option<ColumnValue> {
    value.clone().map(ColumnValue::Text)
}

fn instant(value: &Option<DateTime<Utc>>) -> Option<ColumnValue> {
    value.map(|v| ColumnValue::Text(wire::format_instant(v)))
}

impl Record {
    pub fn table(&self) -> Table {
        match self {
            Record::Product(_) => Table::Products,
            Record::Supplier(_) => Table::Suppliers,
            Record::Transaction(_) => Table::Transactions,
            Record::User(_) => Table::Users,
        }
    }

    /// The primary key.
    pub fn id(&self) -> i64 {
        match self {
            Record::Product(p) => p.id,
            Record::Supplier(s) => s.id,
            Record::Transaction(t) => t.id,
            Record::User(u) => u.id,
        }
    }

    /// Read a column by name. Returns `None` for NULL values and unknown columns.
    pub fn column(&self, name: &str) -> Option<ColumnValue> {
        match self {
            Record::Product(p) => match name {
                "id" => Some(p.id.into()),
                "name" => Some(p.name.as_str().into()),
                "sku" => Some(p.sku.as_str().into()),
                "quantity" => p.quantity.map(ColumnValue::Int),
                "price" => p.price.map(ColumnValue::Real),
                "supplier_id" => p.supplier_id.map(ColumnValue::Int),
                "category" => text(&p.category),
                "min_stock_level" => p.min_stock_level.map(ColumnValue::Int),
                "created_at" => instant(&p.created_at),
                _ => None,
            },
            Record::Supplier(s) => match name {
                "id" => Some(s.id.into()),
                "name" => Some(s.name.as_str().into()),
                "address" => text(&s.address),
                "contact_person" => text(&s.contact_person),
                "contact_number" => text(&s.contact_number),
                "email" => text(&s.email),
                "created_at" => instant(&s.created_at),
                _ => None,
            },
            Record::Transaction(t) => match name {
                "id" => Some(t.id.into()),
                "product_id" => Some(t.product_id.into()),
                "quantity_sold" => Some(t.quantity_sold.into()),
                "date" => Some(wire::format_date(t.date).into()),
                "total" => Some(t.total.into()),
                "user_id" => text(&t.user_id),
                _ => None,
            },
            Record::User(u) => match name {
                "id" => Some(u.id.into()),
                "full_name" => text(&u.full_name),
                "email" => Some(u.email.as_str().into()),
                "role" => text(&u.role),
                "created_at" => instant(&u.created_at),
                _ => None,
            },
        }
    }

    pub fn into_product(self) -> Option<Product> {
        match self {
            Record::Product(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_transaction(self) -> Option<Transaction> {
        match self {
            Record::Transaction(t) => Some(t),
            _ => None,
        }
    }
}

// --- Identity types ---

/// A user as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An issued session. The access token never appears in `Debug` output.
#[derive(Debug)]
pub struct Session {
    pub access_token: secrecy::SecretString,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a successful sign-in or sign-up.
///
/// Sign-up may return no session when the identity service requires
/// email confirmation first.
#[derive(Debug)]
pub struct SignIn {
    pub user: AuthUser,
    pub session: Option<Session>,
}

/// Auth-state transitions delivered to `on_auth_state_change` listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
    UserUpdated(AuthUser),
}

/// Profile fields the settings screen may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn table_names_round_trip() {
        for table in Table::ALL {
            let name = table.to_string();
            assert_eq!(Table::from_str(&name).unwrap(), table);
        }
        assert_eq!(Table::Transactions.to_string(), "transactions");
    }

    #[test]
    fn key_is_first_column() {
        for table in Table::ALL {
            assert_eq!(table.columns()[0], "id");
        }
    }

    #[test]
    fn key_policies_match_tables() {
        assert_eq!(Table::Products.key_policy(), KeyPolicy::Caller);
        assert_eq!(Table::Suppliers.key_policy(), KeyPolicy::Store);
        assert_eq!(Table::Users.key_policy(), KeyPolicy::Store);
        assert_eq!(
            Table::Transactions.key_policy(),
            KeyPolicy::StoreUnlessSupplied
        );
    }

    #[test]
    fn record_columns_read_typed_values() {
        let record = Record::Transaction(Transaction {
            id: 9,
            product_id: 1,
            quantity_sold: 3,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            total: 29.97,
            user_id: None,
            product: None,
        });
        assert_eq!(record.column("id"), Some(ColumnValue::Int(9)));
        assert_eq!(record.column("date"), Some(ColumnValue::Text("2026-02-01".into())));
        assert_eq!(record.column("total"), Some(ColumnValue::Real(29.97)));
        assert_eq!(record.column("user_id"), None);
        assert_eq!(record.column("nope"), None);
    }

    #[test]
    fn record_serializes_with_table_tag() {
        let record = Record::Product(Product {
            id: 1,
            name: "Widget".into(),
            sku: "W-1".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["table"], "product");
        assert_eq!(json["name"], "Widget");
    }

    #[test]
    fn draft_materializes_under_given_key() {
        let draft = RecordDraft::Supplier(SupplierDraft {
            name: "Acme".into(),
            ..Default::default()
        });
        assert_eq!(draft.supplied_key(), None);
        let record = draft.into_record(7, None);
        assert_eq!(record.id(), 7);
        assert_eq!(record.table(), Table::Suppliers);

        let draft = RecordDraft::Transaction(TransactionDraft {
            id: Some(40),
            product_id: 1,
            quantity_sold: 2,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            total: 9.0,
            user_id: None,
        });
        assert_eq!(draft.supplied_key(), Some(40));
    }

    #[test]
    fn product_tolerates_missing_nullable_columns() {
        let p: Product = serde_json::from_str(r#"{"id":1,"name":"Widget","sku":"W-1"}"#).unwrap();
        assert_eq!(p.quantity, None);
        assert_eq!(p.min_stock_level, None);
    }

    #[test]
    fn transaction_date_uses_calendar_format() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":1,"product_id":2,"quantity_sold":1,"date":"2026-02-01","total":5.0}"#,
        )
        .unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }
}
