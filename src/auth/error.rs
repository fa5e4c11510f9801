//! Classified authentication errors.

use thiserror::Error;

use super::validation::ValidationError;

/// Failure of a session operation.
///
/// Every kind is distinguishable by callers, and each maps to its own
/// message through [`AuthError::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email/password did not match an account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but is blocked.
    #[error("account is disabled")]
    AccountDisabled,

    /// Input failed local validation; the provider was not contacted.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] ValidationError),

    /// The user closed the federated sign-in flow.
    #[error("sign-in flow aborted")]
    FlowAborted,

    /// Transport or provider-side failure unrelated to credentials.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Registration email is taken.
    #[error("email already in use")]
    EmailAlreadyInUse,

    /// Provider rejected the registration password.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Provider throttled the account after repeated failures.
    #[error("too many attempts, retry in {retry_after_secs} seconds")]
    TooManyAttempts {
        /// Seconds until another attempt is accepted.
        retry_after_secs: u64,
    },
}

impl AuthError {
    /// Human-readable message for the notification layer.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Incorrect email or password.".to_string(),
            Self::AccountDisabled => "This account has been disabled.".to_string(),
            Self::MalformedInput(e) => format!("Please check your input: {e}."),
            Self::FlowAborted => "Sign-in was cancelled.".to_string(),
            Self::ProviderUnavailable(_) => {
                "Authentication service is unavailable. Please try again.".to_string()
            }
            Self::EmailAlreadyInUse => "This email is already registered.".to_string(),
            Self::WeakPassword(_) => {
                "Password is too weak. Use at least 6 characters.".to_string()
            }
            Self::TooManyAttempts { retry_after_secs } => {
                format!("Too many attempts. Try again in {retry_after_secs} seconds.")
            }
        }
    }
}
