// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity service trait for managed authentication.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::change::SubscriptionGuard;
use crate::error::StockroomError;
use crate::traits::collaborator::Collaborator;
use crate::types::{AuthEvent, AuthUser, ProfileUpdate, SignIn};

/// Listener invoked on every auth-state transition.
pub type AuthCallback = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

/// Handle for an auth-state listener. Dropping it stops delivery.
pub type AuthSubscription = SubscriptionGuard;

/// A managed authentication provider.
///
/// Credential checks happen inside the provider only; there is no local
/// fallback against the `users` table.
#[async_trait]
pub trait IdentityService: Collaborator {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SignIn, StockroomError>;

    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<SignIn, StockroomError>;

    async fn sign_out(&self) -> Result<(), StockroomError>;

    /// The signed-in user, if any.
    async fn current_user(&self) -> Result<Option<AuthUser>, StockroomError>;

    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription;

    async fn update_profile(&self, update: ProfileUpdate) -> Result<AuthUser, StockroomError>;

    async fn update_password(&self, new_password: &SecretString) -> Result<(), StockroomError>;
}
