// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auth session state: who is signed in and the last auth error.
//!
//! The current user is kept in sync with the identity service through an
//! auth-state listener that lives as long as the [`AuthState`].

use std::sync::{Arc, Mutex, MutexGuard};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

use stockroom_config::model::AuthConfig;
use stockroom_core::types::ProfileUpdate;
use stockroom_core::{AuthEvent, AuthSubscription, AuthUser, IdentityService, StockroomError};

/// Password change input from the settings screen.
pub struct PasswordChange {
    /// Collected for parity with the form; the identity service does not
    /// verify it.
    pub current: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("All fields are required")]
    MissingFields,

    #[error("New passwords do not match")]
    Mismatch,

    #[error("New password must be at least {min} characters")]
    TooShort { min: usize },

    #[error(transparent)]
    Identity(#[from] StockroomError),
}

#[derive(Default)]
struct Session {
    user: Option<AuthUser>,
    error: Option<String>,
}

fn lock(m: &Mutex<Session>) -> MutexGuard<'_, Session> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct AuthState {
    identity: Arc<dyn IdentityService>,
    min_password_length: usize,
    session: Arc<Mutex<Session>>,
    _listener: AuthSubscription,
}

impl AuthState {
    /// Load the current user and start listening for auth-state changes.
    pub async fn new(
        identity: Arc<dyn IdentityService>,
        config: &AuthConfig,
    ) -> Result<Self, StockroomError> {
        let session = Arc::new(Mutex::new(Session {
            user: identity.current_user().await?,
            error: None,
        }));

        let sink = Arc::clone(&session);
        let listener = identity.on_auth_state_change(Arc::new(move |event: &AuthEvent| {
            let mut session = lock(&sink);
            match event {
                AuthEvent::SignedIn(user) | AuthEvent::UserUpdated(user) => {
                    session.user = Some(user.clone());
                }
                AuthEvent::SignedOut => session.user = None,
            }
        }));

        Ok(Self {
            identity,
            min_password_length: config.min_password_length,
            session,
            _listener: listener,
        })
    }

    pub fn user(&self) -> Option<AuthUser> {
        lock(&self.session).user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.session).user.is_some()
    }

    /// Message of the last failed login, logout, or signup.
    pub fn error(&self) -> Option<String> {
        lock(&self.session).error.clone()
    }

    fn record<T>(&self, result: Result<T, StockroomError>) -> Result<T, StockroomError> {
        let mut session = lock(&self.session);
        match &result {
            Ok(_) => session.error = None,
            Err(e) => session.error = Some(e.to_string()),
        }
        result
    }

    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthUser, StockroomError> {
        let result = self.identity.sign_in(email, password).await.map(|s| s.user);
        if let Ok(user) = &result {
            lock(&self.session).user = Some(user.clone());
            info!(user = %user.id, "signed in");
        } else {
            warn!("sign-in rejected");
        }
        self.record(result)
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthUser, StockroomError> {
        let result = self.identity.sign_up(email, password).await.map(|s| s.user);
        if let Ok(user) = &result {
            lock(&self.session).user = Some(user.clone());
            info!(user = %user.id, "signed up");
        }
        self.record(result)
    }

    pub async fn logout(&self) -> Result<(), StockroomError> {
        let result = self.identity.sign_out().await;
        if result.is_ok() {
            lock(&self.session).user = None;
            info!("signed out");
        }
        self.record(result)
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<AuthUser, StockroomError> {
        if !self.is_authenticated() {
            return Err(StockroomError::auth("User not authenticated"));
        }
        let user = self.identity.update_profile(update).await?;
        lock(&self.session).user = Some(user.clone());
        Ok(user)
    }

    /// Validate the change locally, then hand the new password to the
    /// identity service.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), PasswordError> {
        let (current, new, confirm) = (
            change.current.expose_secret(),
            change.new.expose_secret(),
            change.confirm.expose_secret(),
        );
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(PasswordError::MissingFields);
        }
        if new != confirm {
            return Err(PasswordError::Mismatch);
        }
        if new.chars().count() < self.min_password_length {
            return Err(PasswordError::TooShort {
                min: self.min_password_length,
            });
        }
        self.identity.update_password(&change.new).await?;
        info!("password changed");
        Ok(())
    }
}
