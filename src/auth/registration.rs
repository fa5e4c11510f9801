//! User registration request for ContestHub.

use super::validation::{validate_registration, ValidationError};

/// Registration form data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Name shown on the profile (1-40 characters).
    pub display_name: String,
    /// Optional avatar URL.
    pub photo_url: Option<String>,
    /// Email used to sign in.
    pub email: String,
    /// Password (6-128 characters, mixed case).
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            photo_url: None,
            email: email.into(),
            password: password.into(),
        }
    }

    /// Set the avatar URL.
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }

    /// Validate all fields, returning the first error in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_registration(
            &self.display_name,
            self.photo_url.as_deref(),
            &self.email,
            &self.password,
        )
    }
}
