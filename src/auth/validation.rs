//! Input validation for ContestHub sign-in and registration forms.
//!
//! Everything here runs before the identity provider is contacted, so a
//! malformed form never costs a network round-trip.

use thiserror::Error;
use url::Url;

/// Minimum registration password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum display name length.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 40;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email is empty.
    #[error("email is required")]
    EmailRequired,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Password is empty.
    #[error("password is required")]
    PasswordRequired,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password lacks an uppercase or a lowercase letter.
    #[error("password must include uppercase and lowercase letters")]
    PasswordMissingCase,

    /// Display name is empty.
    #[error("name cannot be empty")]
    DisplayNameEmpty,

    /// Display name is too long.
    #[error("name must be at most {MAX_DISPLAY_NAME_LENGTH} characters")]
    DisplayNameTooLong,

    /// Display name contains control characters.
    #[error("name contains invalid characters")]
    DisplayNameInvalidChars,

    /// Photo URL is not an absolute http(s) URL.
    #[error("photo URL must be an http or https URL")]
    PhotoUrlInvalid,
}

/// Validate an email address.
///
/// # Examples
///
/// ```
/// use contesthub::auth::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("").is_err()); // required
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    // Basic format check: exactly one @ with text on both sides
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }

    // Domain must contain at least one dot and no empty labels
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

/// Validate a sign-in password.
///
/// Sign-in only requires a value; strength rules apply at registration.
pub fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// Validate a registration password.
///
/// Requirements:
/// - Length: 6-128 characters
/// - At least one uppercase and one lowercase letter
///
/// # Examples
///
/// ```
/// use contesthub::auth::validation::validate_registration_password;
///
/// assert!(validate_registration_password("Secret1").is_ok());
/// assert!(validate_registration_password("Ab1").is_err()); // too short
/// assert!(validate_registration_password("lowercase").is_err()); // no uppercase
/// ```
pub fn validate_registration_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    if !has_upper || !has_lower {
        return Err(ValidationError::PasswordMissingCase);
    }

    Ok(())
}

/// Validate a display name.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::DisplayNameEmpty);
    }

    // Length in characters, not bytes
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::DisplayNameTooLong);
    }

    if name.chars().any(char::is_control) {
        return Err(ValidationError::DisplayNameInvalidChars);
    }

    Ok(())
}

/// Validate an avatar URL (optional field).
///
/// Empty is OK. Otherwise it must parse as an absolute http or https URL.
pub fn validate_photo_url(photo_url: &str) -> Result<(), ValidationError> {
    if photo_url.is_empty() {
        return Ok(());
    }

    match Url::parse(photo_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(()),
        _ => Err(ValidationError::PhotoUrlInvalid),
    }
}

/// Validate a sign-in form.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_login_password(password)
}

/// Validate all registration fields at once.
///
/// Returns the first validation error encountered, in form order.
pub fn validate_registration(
    display_name: &str,
    photo_url: Option<&str>,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_display_name(display_name)?;
    if let Some(url) = photo_url {
        validate_photo_url(url)?;
    }
    validate_email(email)?;
    validate_registration_password(password)
}
