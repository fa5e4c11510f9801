//! Sign-in and registration pages.
//!
//! Pages run the store operations behind their forms and tell the caller
//! where to navigate next and what notice to show.

mod login;
mod register;

pub use login::{LoginForm, LoginPage};
pub use register::RegisterPage;

use crate::auth::{AuthError, AuthSession};
use crate::routing::NavigationRequest;

/// Severity of a toast notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// Short feedback message shown after a form action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text to show.
    pub message: String,
}

impl Notice {
    /// Create a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Create an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Create the error notice for a failed operation.
    pub fn from_error(error: &AuthError) -> Self {
        Self::error(error.user_message())
    }

    /// Check if this is an error notice.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Result of a completed sign-in from either page.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// Session after sign-in.
    pub session: AuthSession,
    /// Where to go next.
    pub navigation: NavigationRequest,
    /// Feedback for the user.
    pub notice: Notice,
}

/// Greeting for a signed-in session.
fn welcome(session: &AuthSession) -> Notice {
    match session.user() {
        Some(user) => Notice::success(format!("Welcome, {}!", user.display_name)),
        None => Notice::success("Signed in."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    #[test]
    fn test_notice_from_error() {
        let notice = Notice::from_error(&AuthError::InvalidCredentials);

        assert!(notice.is_error());
        assert_eq!(notice.message, AuthError::InvalidCredentials.user_message());
    }

    #[test]
    fn test_welcome_uses_display_name() {
        let session = AuthSession::Authenticated(AuthUser::new("uid-1", "Ada"));
        let notice = welcome(&session);

        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Welcome, Ada!");
    }
}
