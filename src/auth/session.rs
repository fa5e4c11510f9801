//! Authentication session state for ContestHub.
//!
//! [`AuthSession`] is the application's belief about who, if anyone, is
//! currently signed in. The signed-in user lives inside the `Authenticated`
//! variant, so a session can never carry a user while unauthenticated.

use std::fmt;

use chrono::{DateTime, Utc};

/// Coarse authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStatus {
    /// The provider has not reported yet.
    Unknown,
    /// A user is signed in.
    Authenticated,
    /// Nobody is signed in.
    Unauthenticated,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(s)
    }
}

/// Identity record of a signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Stable identifier assigned by the provider.
    pub uid: String,
    /// Name shown in the navbar and dashboard.
    pub display_name: String,
    /// Email address, when the provider exposes one.
    pub email: Option<String>,
    /// Avatar URL.
    pub photo_url: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl AuthUser {
    /// Create a user with just an identifier and a display name.
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            email: None,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the avatar URL.
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

/// Current authentication state of the application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthSession {
    /// Initial state before the provider's first notification.
    #[default]
    Unknown,
    /// A user is signed in.
    Authenticated(AuthUser),
    /// The provider reported that nobody is signed in.
    Unauthenticated,
}

impl AuthSession {
    /// Build the session implied by a provider notification.
    pub fn from_provider(user: Option<AuthUser>) -> Self {
        match user {
            Some(user) => Self::Authenticated(user),
            None => Self::Unauthenticated,
        }
    }

    /// Get the coarse status.
    pub fn status(&self) -> AuthStatus {
        match self {
            Self::Unknown => AuthStatus::Unknown,
            Self::Authenticated(_) => AuthStatus::Authenticated,
            Self::Unauthenticated => AuthStatus::Unauthenticated,
        }
    }

    /// Get the signed-in user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Check if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Check if the provider has reported at least once.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}
