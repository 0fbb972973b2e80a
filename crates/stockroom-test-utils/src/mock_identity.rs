// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock identity service with in-memory accounts.
//!
//! Accounts are keyed by email. Every successful sign-in, sign-up, sign-out,
//! and profile update is broadcast to registered auth-state listeners after
//! internal locks are released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

use stockroom_core::types::{ProfileUpdate, Session, SignIn};
use stockroom_core::{
    AuthCallback, AuthEvent, AuthSubscription, AuthUser, Collaborator, HealthStatus,
    IdentityService, StockroomError, SubscriptionGuard,
};

struct Account {
    user: AuthUser,
    password: SecretString,
}

#[derive(Default)]
struct IdentityState {
    accounts: HashMap<String, Account>,
    current: Option<String>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: Vec<(u64, AuthCallback)>,
}

/// An `IdentityService` backed by a map of accounts.
#[derive(Default)]
pub struct MockIdentity {
    state: Mutex<IdentityState>,
    listeners: Arc<Mutex<Listeners>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account up front.
    pub fn with_account(self, email: &str, password: &str, full_name: Option<&str>) -> Self {
        lock(&self.state).accounts.insert(
            email.to_string(),
            Account {
                user: AuthUser {
                    id: uuid::Uuid::new_v4().to_string(),
                    email: email.to_string(),
                    full_name: full_name.map(str::to_string),
                    phone: None,
                },
                password: SecretString::from(password.to_string()),
            },
        );
        self
    }

    /// Whether `password` is the current password of `email`.
    pub fn password_matches(&self, email: &str, password: &str) -> bool {
        lock(&self.state)
            .accounts
            .get(email)
            .is_some_and(|a| a.password.expose_secret() == password)
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).callbacks.len()
    }

    fn emit(&self, event: AuthEvent) {
        let callbacks: Vec<AuthCallback> = lock(&self.listeners)
            .callbacks
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(&event);
        }
    }

    fn session() -> Session {
        Session {
            access_token: SecretString::from(uuid::Uuid::new_v4().to_string()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
        }
    }

    fn current_email(&self) -> Result<String, StockroomError> {
        lock(&self.state)
            .current
            .clone()
            .ok_or_else(|| StockroomError::auth("not signed in"))
    }
}

#[async_trait]
impl Collaborator for MockIdentity {
    fn name(&self) -> &str {
        "mock-identity"
    }

    async fn health_check(&self) -> Result<HealthStatus, StockroomError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl IdentityService for MockIdentity {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SignIn, StockroomError> {
        let user = {
            let mut state = lock(&self.state);
            let user = match state.accounts.get(email) {
                Some(account) if account.password.expose_secret() == password.expose_secret() => {
                    account.user.clone()
                }
                _ => return Err(StockroomError::auth("Invalid login credentials")),
            };
            state.current = Some(email.to_string());
            user
        };
        self.emit(AuthEvent::SignedIn(user.clone()));
        Ok(SignIn {
            user,
            session: Some(Self::session()),
        })
    }

    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<SignIn, StockroomError> {
        let user = {
            let mut state = lock(&self.state);
            if state.accounts.contains_key(email) {
                return Err(StockroomError::auth("User already registered"));
            }
            let user = AuthUser {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.to_string(),
                full_name: None,
                phone: None,
            };
            state.accounts.insert(
                email.to_string(),
                Account {
                    user: user.clone(),
                    password: password.clone(),
                },
            );
            state.current = Some(email.to_string());
            user
        };
        self.emit(AuthEvent::SignedIn(user.clone()));
        Ok(SignIn {
            user,
            session: Some(Self::session()),
        })
    }

    async fn sign_out(&self) -> Result<(), StockroomError> {
        lock(&self.state).current = None;
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, StockroomError> {
        let state = lock(&self.state);
        Ok(state
            .current
            .as_ref()
            .and_then(|email| state.accounts.get(email))
            .map(|a| a.user.clone()))
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription {
        let id = {
            let mut listeners = lock(&self.listeners);
            listeners.next_id += 1;
            let id = listeners.next_id;
            listeners.callbacks.push((id, callback));
            id
        };
        let weak: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        SubscriptionGuard::new(move || {
            if let Some(listeners) = weak.upgrade() {
                lock(&listeners).callbacks.retain(|(i, _)| *i != id);
            }
        })
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<AuthUser, StockroomError> {
        let email = self.current_email()?;
        let user = {
            let mut state = lock(&self.state);
            let account = state
                .accounts
                .get_mut(&email)
                .ok_or_else(|| StockroomError::auth("account no longer exists"))?;
            if update.full_name.is_some() {
                account.user.full_name = update.full_name;
            }
            if update.phone.is_some() {
                account.user.phone = update.phone;
            }
            account.user.clone()
        };
        self.emit(AuthEvent::UserUpdated(user.clone()));
        Ok(user)
    }

    async fn update_password(&self, new_password: &SecretString) -> Result<(), StockroomError> {
        let email = self.current_email()?;
        let mut state = lock(&self.state);
        let account = state
            .accounts
            .get_mut(&email)
            .ok_or_else(|| StockroomError::auth("account no longer exists"))?;
        account.password = new_password.clone();
        Ok(())
    }
}
