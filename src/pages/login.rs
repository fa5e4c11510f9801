//! Login page.

use std::sync::Arc;

use tracing::info;

use super::{welcome, LoginSuccess};
use crate::auth::{AuthError, AuthSession, SessionStore};
use crate::config::RoutesConfig;
use crate::routing::{Location, NavigationIntent, NavigationRequest};

/// Email/password form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl LoginForm {
    /// Create a filled-in form.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Login page bound to one visit of the login location.
///
/// Holds the [`NavigationIntent`] the guard attached to the location. The
/// intent is taken when a sign-in succeeds; a failed attempt keeps it for
/// the next try, and abandoning the page drops it.
pub struct LoginPage {
    store: Arc<SessionStore>,
    default_landing: String,
    intent: Option<NavigationIntent>,
}

impl LoginPage {
    /// Open the login page at `location`.
    pub fn new(store: Arc<SessionStore>, routes: &RoutesConfig, location: &Location) -> Self {
        Self {
            store,
            default_landing: routes.default_landing.clone(),
            intent: location.state.clone(),
        }
    }

    /// Get the pending destination, if the user was diverted here.
    pub fn intent(&self) -> Option<&NavigationIntent> {
        self.intent.as_ref()
    }

    /// Sign in with the form's email and password.
    pub async fn submit(&mut self, form: &LoginForm) -> Result<LoginSuccess, AuthError> {
        let session = self
            .store
            .sign_in_with_credentials(&form.email, &form.password)
            .await?;
        Ok(self.complete(session))
    }

    /// Sign in through the federated provider.
    pub async fn continue_with_federated(&mut self) -> Result<LoginSuccess, AuthError> {
        let session = self.store.sign_in_with_federated_provider().await?;
        Ok(self.complete(session))
    }

    fn complete(&mut self, session: AuthSession) -> LoginSuccess {
        let target = match self.intent.take() {
            Some(intent) => intent.target_path,
            None => self.default_landing.clone(),
        };
        info!(to = %target, "Login complete, leaving login page");

        LoginSuccess {
            notice: welcome(&session),
            navigation: NavigationRequest::replace(target),
            session,
        }
    }
}
