//! Access gate for protected routes.
//!
//! The guard keeps no state: each decision depends only on the session and
//! location handed to [`RouteGuard::evaluate`]. Callers re-evaluate whenever
//! the session changes.

use tracing::debug;

use super::history::{Location, NavigationRequest};
use super::intent::NavigationIntent;
use crate::auth::AuthSession;

/// Outcome of evaluating a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision<C> {
    /// Session not resolved yet: show a placeholder and do not navigate.
    Loading,
    /// Signed out: navigate to login, replacing the current entry.
    Redirect(NavigationRequest),
    /// Signed in: show the protected content.
    Render(C),
}

impl<C> GuardDecision<C> {
    /// Check if this decision shows the placeholder.
    pub fn is_loading(&self) -> bool {
        matches!(self, GuardDecision::Loading)
    }

    /// Get the redirect, if any.
    pub fn redirect(&self) -> Option<&NavigationRequest> {
        match self {
            GuardDecision::Redirect(request) => Some(request),
            _ => None,
        }
    }

    /// Get the content, if rendered.
    pub fn into_content(self) -> Option<C> {
        match self {
            GuardDecision::Render(content) => Some(content),
            _ => None,
        }
    }
}

/// Guard for routes that need a signed-in user.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl RouteGuard {
    /// Create a guard that diverts to `login_path`.
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    /// Get the login path.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide what to show for protected `content` at `location`.
    ///
    /// A redirect carries a [`NavigationIntent`] for the location so the
    /// login page can send the user back after signing in.
    pub fn evaluate<C>(
        &self,
        session: &AuthSession,
        location: &Location,
        content: C,
    ) -> GuardDecision<C> {
        match session {
            AuthSession::Unknown => GuardDecision::Loading,
            AuthSession::Unauthenticated => {
                debug!(from = %location.path, to = %self.login_path, "Diverting to login");
                GuardDecision::Redirect(
                    NavigationRequest::replace(&self.login_path)
                        .with_intent(NavigationIntent::new(&location.path)),
                )
            }
            AuthSession::Authenticated(_) => GuardDecision::Render(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use crate::routing::NavigationMode;

    fn guard() -> RouteGuard {
        RouteGuard::new("/login")
    }

    #[test]
    fn test_unknown_is_loading() {
        let location = Location::new("/dashboard");

        for _ in 0..3 {
            let decision = guard().evaluate(&AuthSession::Unknown, &location, "dashboard");
            assert!(decision.is_loading());
            assert!(decision.redirect().is_none());
        }
    }

    #[test]
    fn test_unauthenticated_redirects_with_intent() {
        let decision = guard().evaluate(
            &AuthSession::Unauthenticated,
            &Location::new("/dashboard"),
            "dashboard",
        );

        let request = decision.redirect().unwrap();
        assert_eq!(request.to, "/login");
        assert_eq!(request.mode, NavigationMode::Replace);
        assert_eq!(
            request.intent.as_ref().map(|i| i.target_path.as_str()),
            Some("/dashboard")
        );
    }

    #[test]
    fn test_authenticated_renders() {
        let session = AuthSession::Authenticated(AuthUser::new("uid-1", "Ada"));
        let decision = guard().evaluate(&session, &Location::new("/dashboard"), "dashboard");

        assert_eq!(decision, GuardDecision::Render("dashboard"));
        assert_eq!(decision.into_content(), Some("dashboard"));
    }
}
