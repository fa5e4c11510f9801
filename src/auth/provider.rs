//! Identity provider port.
//!
//! The session store delegates every credential check and account change to
//! an [`IdentityProvider`]. Providers are push-based: besides answering
//! calls, they report session changes (login, logout, token invalidation)
//! to the callbacks registered through [`IdentityProvider::on_session_change`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::AuthError;
use super::session::AuthUser;

/// Callback invoked by the provider with the signed-in user, or `None`
/// after a logout or invalidation.
pub type SessionChangeCallback = Arc<dyn Fn(Option<AuthUser>) + Send + Sync>;

/// Profile fields that can be changed after account creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name.
    pub display_name: Option<String>,
    /// New avatar URL.
    pub photo_url: Option<String>,
}

/// Registration with the provider's session-change feed.
///
/// Releasing it deregisters the callback. Dropping an unreleased
/// subscription releases it too, so the release runs exactly once.
#[must_use = "dropping a provider subscription deregisters its callback"]
pub struct ProviderSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ProviderSubscription {
    /// Create a subscription that runs `release` when released.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Deregister the callback.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ProviderSubscription {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for ProviderSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an email/password pair and start a provider session.
    ///
    /// # Errors
    /// `InvalidCredentials`, `AccountDisabled`, `TooManyAttempts` or
    /// `ProviderUnavailable`.
    async fn verify_credentials(&self, email: &str, password: &str)
        -> Result<AuthUser, AuthError>;

    /// Run the provider-hosted interactive sign-in flow.
    ///
    /// # Errors
    /// `FlowAborted` when the user closes the flow, or `ProviderUnavailable`.
    async fn start_federated_flow(&self) -> Result<AuthUser, AuthError>;

    /// End the provider session.
    async fn terminate_session(&self) -> Result<(), AuthError>;

    /// Create an account and sign it in.
    ///
    /// # Errors
    /// `EmailAlreadyInUse`, `WeakPassword` or `ProviderUnavailable`.
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Update profile fields of an account and return the updated user.
    async fn update_profile(&self, uid: &str, update: ProfileUpdate)
        -> Result<AuthUser, AuthError>;

    /// Register a session-change callback.
    fn on_session_change(&self, callback: SessionChangeCallback) -> ProviderSubscription;
}
