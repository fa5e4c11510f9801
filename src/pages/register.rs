//! Registration page.

use std::sync::Arc;

use tracing::info;

use super::{welcome, LoginSuccess};
use crate::auth::{AuthError, AuthSession, RegistrationRequest, SessionStore};
use crate::config::RoutesConfig;
use crate::routing::NavigationRequest;

/// Registration page.
///
/// A new account is signed in straight away and sent to the home page.
/// Any intent on the location is ignored.
pub struct RegisterPage {
    store: Arc<SessionStore>,
    home: String,
}

impl RegisterPage {
    /// Open the registration page.
    pub fn new(store: Arc<SessionStore>, routes: &RoutesConfig) -> Self {
        Self {
            store,
            home: routes.home.clone(),
        }
    }

    /// Create the account described by the form.
    pub async fn submit(&self, request: &RegistrationRequest) -> Result<LoginSuccess, AuthError> {
        let session = self.store.register(request).await?;
        Ok(self.complete(session))
    }

    /// Sign up through the federated provider.
    pub async fn continue_with_federated(&self) -> Result<LoginSuccess, AuthError> {
        let session = self.store.sign_in_with_federated_provider().await?;
        Ok(self.complete(session))
    }

    fn complete(&self, session: AuthSession) -> LoginSuccess {
        info!(to = %self.home, "Registration complete, leaving register page");

        LoginSuccess {
            notice: welcome(&session),
            navigation: NavigationRequest::push(&self.home),
            session,
        }
    }
}
