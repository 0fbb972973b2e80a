// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the admin panel state against in-memory collaborators.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;

use stockroom_admin::{
    AuthState, NotificationPanel, PasswordChange, PasswordError, RecordForm, SubmitError,
    TableBrowser,
};
use stockroom_config::model::{AuthConfig, NotificationsConfig};
use stockroom_core::types::ProfileUpdate;
use stockroom_core::{DataStore, IdentityService, Record, StockroomError, Table};
use stockroom_notify::{FixedClock, NotificationFeed};
use stockroom_test_utils::fixtures::{instant, product, transaction_draft};
use stockroom_test_utils::{MemoryStore, MockIdentity};

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_records([
        Record::Product(product(1, "Blue Widget", 10, 5)),
        Record::Product(product(2, "Red Gadget", 1, 3)),
        Record::Product(product(3, "Blue Gizmo", 7, 2)),
    ]))
}

// --- Table browser ---

#[tokio::test]
async fn browser_loads_and_filters_rows() {
    let store = store();
    let mut browser = TableBrowser::new(store, Table::Products);
    browser.reload().await.unwrap();
    assert_eq!(browser.rows().len(), 3);

    browser.set_search("BLUE");
    let names: Vec<_> = browser
        .visible_rows()
        .into_iter()
        .filter_map(|r| r.clone().into_product())
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Blue Widget", "Blue Gizmo"]);
}

#[tokio::test]
async fn browser_keeps_rows_when_reload_fails() {
    let store = store();
    let mut browser = TableBrowser::new(store.clone(), Table::Products);
    browser.reload().await.unwrap();

    store.fail_selects(Table::Products, true);
    assert!(browser.reload().await.is_err());
    assert_eq!(browser.rows().len(), 3);
    assert!(browser.error().unwrap().contains("products"));

    store.fail_selects(Table::Products, false);
    browser.reload().await.unwrap();
    assert_eq!(browser.error(), None);
}

#[tokio::test]
async fn browser_delete_reloads() {
    let store = store();
    let mut browser = TableBrowser::new(store.clone(), Table::Products);
    browser.reload().await.unwrap();

    browser.delete(2).await.unwrap();
    assert_eq!(browser.rows().len(), 2);
    assert!(browser.find(2).is_none());

    let err = browser.delete(42).await.unwrap_err();
    assert!(matches!(err, StockroomError::NotFound { id: 42, .. }));
    assert_eq!(browser.rows().len(), 2);
}

#[tokio::test]
async fn switching_tables_clears_search_and_rows() {
    let store = store();
    store.insert(transaction_draft(1, 2, "2026-03-01")).await.unwrap();
    let mut browser = TableBrowser::new(store, Table::Products);
    browser.reload().await.unwrap();
    browser.set_search("blue");

    browser.select_table(Table::Transactions).await.unwrap();
    assert_eq!(browser.table(), Table::Transactions);
    assert_eq!(browser.search(), "");
    assert_eq!(browser.rows().len(), 1);
    assert_eq!(browser.headers()[3], "date");
}

// --- Record form ---

#[tokio::test]
async fn add_form_inserts_a_supplier() {
    let store = store();
    let mut form = RecordForm::add(Table::Suppliers);
    form.set("name", "Acme Corp");
    form.set("email", "orders@acme.test");

    let record = form.submit(store.as_ref()).await.unwrap();
    assert_eq!(record.table(), Table::Suppliers);
    assert_eq!(store.rows(Table::Suppliers).len(), 1);
}

#[tokio::test]
async fn edit_form_updates_by_original_key() {
    let store = store();
    let original = store.rows(Table::Products).remove(0);
    let mut form = RecordForm::edit(&original);
    assert_eq!(form.value("name"), "Blue Widget");
    assert_eq!(form.value("quantity"), "10");

    form.set("quantity", "3");
    let updated = form
        .submit(store.as_ref())
        .await
        .unwrap()
        .into_product()
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.quantity, Some(3));
    assert_eq!(updated.min_stock_level, Some(5));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_store() {
    let store = store();
    store.fail_writes(true);
    let mut form = RecordForm::add(Table::Transactions);
    form.set("product_id", "1");

    let err = form.submit(store.as_ref()).await.unwrap_err();
    let SubmitError::Invalid(errors) = err else {
        panic!("expected field errors, got {err:?}");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
    assert_eq!(fields, ["quantity_sold", "date", "total"]);
}

#[tokio::test]
async fn store_rejection_surfaces_as_store_error() {
    let store = store();
    let mut form = RecordForm::add(Table::Products);
    for (k, v) in [("id", "1"), ("name", "Dup"), ("sku", "D"), ("quantity", "1")] {
        form.set(k, v);
    }
    let err = form.submit(store.as_ref()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Store(StockroomError::Validation { .. })));
}

// --- Auth session state ---

async fn auth() -> (Arc<MockIdentity>, AuthState) {
    let identity = Arc::new(MockIdentity::new().with_account("ada@stockroom.test", "hunter22", Some("Ada")));
    let state = AuthState::new(identity.clone(), &AuthConfig::default())
        .await
        .unwrap();
    (identity, state)
}

#[tokio::test]
async fn login_failure_records_error_and_success_clears_it() {
    let (_identity, state) = auth().await;
    assert!(!state.is_authenticated());

    assert!(state.login("ada@stockroom.test", &secret("nope")).await.is_err());
    assert!(state.error().unwrap().contains("Invalid login credentials"));

    let user = state.login("ada@stockroom.test", &secret("hunter22")).await.unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Ada"));
    assert_eq!(state.error(), None);

    state.logout().await.unwrap();
    assert!(state.user().is_none());
}

#[tokio::test]
async fn state_follows_external_auth_events() {
    let (identity, state) = auth().await;
    identity
        .sign_in("ada@stockroom.test", &secret("hunter22"))
        .await
        .unwrap();
    assert!(state.is_authenticated());

    identity.sign_out().await.unwrap();
    assert!(!state.is_authenticated());
}

#[tokio::test]
async fn signup_signs_the_new_user_in() {
    let (_identity, state) = auth().await;
    let user = state.signup("new@stockroom.test", &secret("longenough")).await.unwrap();
    assert_eq!(state.user().unwrap().id, user.id);

    assert!(state.signup("new@stockroom.test", &secret("x")).await.is_err());
    assert!(state.error().is_some());
}

#[tokio::test]
async fn profile_update_requires_a_user() {
    let (_identity, state) = auth().await;
    let update = ProfileUpdate {
        full_name: Some("Ada Lovelace".into()),
        phone: Some("555-0100".into()),
    };
    assert!(state.update_profile(update.clone()).await.is_err());

    state.login("ada@stockroom.test", &secret("hunter22")).await.unwrap();
    let user = state.update_profile(update).await.unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(state.user().unwrap().phone.as_deref(), Some("555-0100"));
}

#[tokio::test]
async fn password_change_is_validated_before_the_identity_call() {
    let (identity, state) = auth().await;
    state.login("ada@stockroom.test", &secret("hunter22")).await.unwrap();

    let change = |current: &str, new: &str, confirm: &str| PasswordChange {
        current: secret(current),
        new: secret(new),
        confirm: secret(confirm),
    };

    let err = state.change_password(&change("", "abcdef", "abcdef")).await.unwrap_err();
    assert_eq!(err.to_string(), "All fields are required");

    let err = state.change_password(&change("hunter22", "abcdef", "abcdeg")).await.unwrap_err();
    assert_eq!(err.to_string(), "New passwords do not match");

    let err = state.change_password(&change("hunter22", "abc", "abc")).await.unwrap_err();
    assert!(matches!(err, PasswordError::TooShort { min: 6 }));
    assert_eq!(err.to_string(), "New password must be at least 6 characters");

    state.change_password(&change("hunter22", "abcdef", "abcdef")).await.unwrap();
    assert!(identity.password_matches("ada@stockroom.test", "abcdef"));
}

// --- Notification panel fed by the live feed ---

#[tokio::test]
async fn panel_tracks_the_live_feed() {
    let store = store();
    let feed = NotificationFeed::new(
        store.clone(),
        Arc::new(FixedClock(instant("2026-03-10T12:00:00Z"))),
        &NotificationsConfig::default(),
    );

    let panel = Arc::new(Mutex::new(NotificationPanel::new()));
    let sink = Arc::clone(&panel);
    let handle = feed
        .start(move |snapshot| {
            sink.lock().unwrap().apply(snapshot);
        })
        .await;

    {
        let mut panel = panel.lock().unwrap();
        assert_eq!(panel.visible().len(), 1);
        assert!(panel.dismiss("low-stock-2"));
        assert_eq!(panel.unread_count(), 0);
    }

    store.insert(transaction_draft(3, 6, "2026-03-10")).await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), async {
        while panel.lock().unwrap().generation() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("panel should receive the rebuild");

    let panel = panel.lock().unwrap();
    let visible: Vec<_> = panel.visible().iter().map(|n| n.message.clone()).collect();
    assert_eq!(visible, ["Blue Gizmo - 6 units sold for $59.94"]);
    drop(panel);
    handle.stop().await;
}
