use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use eduquery_core::models::user::UserPatch;

use crate::error::AuthError;

/// What the account store hands back for an authenticated session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub access_token: String,
}

/// Session-change notification delivered on the store's subscription channel.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn { user_id: Uuid },
    SignedOut,
}

/// Raw profile row with its joined role relation, before validation.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    /// Role name as stored; `None` when the join produced no row.
    pub role: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// The external account/session store.
///
/// Injected into [`crate::session::SessionManager`] at construction so tests
/// can supply in-memory doubles. Implementations are expected to classify
/// credential failures as [`AuthError::InvalidCredentials`] and missing
/// profile rows as [`AuthError::ProfileNotFound`]; everything else passes
/// through as [`AuthError::Store`] with the upstream message intact.
pub trait AccountStore {
    /// Return the existing session, if any, without prompting for credentials.
    async fn current_session(&self) -> Result<Option<AuthSession>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Create the credential account only. The profile row is a separate
    /// insert via [`AccountStore::create_profile`].
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Read a profile row with its role relation joined in.
    async fn fetch_profile(&self, user_id: Uuid) -> Result<ProfileRecord, AuthError>;

    async fn create_profile(
        &self,
        user_id: Uuid,
        email: &str,
        full_name: &str,
    ) -> Result<(), AuthError>;

    /// Remote repair procedure that creates a missing profile row for an
    /// account that exists on the credential side.
    async fn provision_profile(&self, user_id: Uuid) -> Result<(), AuthError>;

    async fn update_profile(&self, user_id: Uuid, patch: &UserPatch) -> Result<(), AuthError>;

    /// Compensating delete for a freshly created account whose profile
    /// insert failed.
    async fn delete_account(&self, user_id: Uuid) -> Result<(), AuthError>;

    /// Subscribe to session-change notifications.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

impl<S: AccountStore> AccountStore for Arc<S> {
    async fn current_session(&self) -> Result<Option<AuthSession>, AuthError> {
        (**self).current_session().await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        (**self).sign_in(email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, AuthError> {
        (**self).sign_up(email, password, full_name).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        (**self).sign_out().await
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<ProfileRecord, AuthError> {
        (**self).fetch_profile(user_id).await
    }

    async fn create_profile(
        &self,
        user_id: Uuid,
        email: &str,
        full_name: &str,
    ) -> Result<(), AuthError> {
        (**self).create_profile(user_id, email, full_name).await
    }

    async fn provision_profile(&self, user_id: Uuid) -> Result<(), AuthError> {
        (**self).provision_profile(user_id).await
    }

    async fn update_profile(&self, user_id: Uuid, patch: &UserPatch) -> Result<(), AuthError> {
        (**self).update_profile(user_id, patch).await
    }

    async fn delete_account(&self, user_id: Uuid) -> Result<(), AuthError> {
        (**self).delete_account(user_id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        (**self).subscribe()
    }
}
