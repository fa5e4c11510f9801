//! Error types for ContestHub.

use thiserror::Error;

/// Common error type for ContestHub setup and plumbing.
///
/// Authentication failures have their own classified type,
/// [`AuthError`](crate::auth::AuthError), which is what session
/// operations return.
#[derive(Error, Debug)]
pub enum ContestHubError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Logging could not be initialized.
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type alias for ContestHub operations.
pub type Result<T> = std::result::Result<T, ContestHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ContestHubError::Config("missing [routes] table".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: missing [routes] table"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ContestHubError::Validation("login path must start with '/'".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: login path must start with '/'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml not found");
        let err: ContestHubError = io_err.into();
        assert!(matches!(err, ContestHubError::Io(_)));
        assert!(err.to_string().contains("config.toml not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(ContestHubError::Logging("subscriber already set".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
