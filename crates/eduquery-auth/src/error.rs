use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    /// Wrong email/password. The message is the exact user-facing copy; store
    /// implementations map their credential-failure codes onto this variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("profile not found for user {0}")]
    ProfileNotFound(Uuid),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("no user is signed in")]
    NotSignedIn,

    /// Sign-up failed after the credential account was already created.
    /// `rollback` carries the compensating delete's own failure, if any, so
    /// neither error is lost.
    #[error("sign up failed: {reason}")]
    SignUpRollback {
        reason: String,
        rollback: Option<String>,
    },

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Core(#[from] eduquery_core::error::CoreError),
}
