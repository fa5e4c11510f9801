//! Configuration module for ContestHub.

use serde::Deserialize;
use std::path::Path;

use crate::{ContestHubError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/contesthub.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Route paths used by the application shell, the guard and the pages.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesConfig {
    /// Home page path.
    #[serde(default = "default_home_path")]
    pub home: String,
    /// Login entry point the guard diverts to.
    #[serde(default = "default_login_path")]
    pub login: String,
    /// Registration page path.
    #[serde(default = "default_register_path")]
    pub register: String,
    /// Protected dashboard path.
    #[serde(default = "default_dashboard_path")]
    pub dashboard: String,
    /// Where a successful login lands when no destination was captured.
    #[serde(default = "default_landing_path")]
    pub default_landing: String,
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_register_path() -> String {
    "/register".to_string()
}

fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

fn default_landing_path() -> String {
    "/".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            home: default_home_path(),
            login: default_login_path(),
            register: default_register_path(),
            dashboard: default_dashboard_path(),
            default_landing: default_landing_path(),
        }
    }
}

/// Development identity provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Label of the federated provider shown on the login button.
    #[serde(default = "default_federated_provider")]
    pub federated_provider: String,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
    /// Argon2 iterations.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 parallelism.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
    /// Failed sign-in attempts allowed inside the window.
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    /// Window and lockout duration in seconds.
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

fn default_federated_provider() -> String {
    "Google".to_string()
}

fn default_hash_memory_kib() -> u32 {
    19456 // 19 MiB
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

fn default_max_login_attempts() -> u32 {
    5
}

fn default_lockout_secs() -> u64 {
    300 // 5 minutes
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            federated_provider: default_federated_provider(),
            hash_memory_kib: default_hash_memory_kib(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
            max_login_attempts: default_max_login_attempts(),
            lockout_secs: default_lockout_secs(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Route paths.
    #[serde(default)]
    pub routes: RoutesConfig,
    /// Identity provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ContestHubError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load and validate configuration, falling back to defaults.
    ///
    /// Environment overrides apply in both cases. The load or validation
    /// error, if any, is returned alongside so the caller can report it.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<ContestHubError>) {
        match Self::load_with_env(path).and_then(|config| config.validate().map(|_| config)) {
            Ok(config) => (config, None),
            Err(e) => {
                let mut config = Self::default();
                config.apply_env_overrides();
                (config, Some(e))
            }
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ContestHubError::Config(format!("parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CONTESTHUB_LOG_LEVEL`: Override the log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("CONTESTHUB_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - a route path is not absolute
    /// - the default landing path is the login path (a login would loop)
    /// - the lockout policy allows zero attempts
    pub fn validate(&self) -> Result<()> {
        let routes = &self.routes;
        for (name, path) in [
            ("home", &routes.home),
            ("login", &routes.login),
            ("register", &routes.register),
            ("dashboard", &routes.dashboard),
            ("default_landing", &routes.default_landing),
        ] {
            if !path.starts_with('/') {
                return Err(ContestHubError::Validation(format!(
                    "routes.{name} must start with '/', got {path:?}"
                )));
            }
        }

        if routes.default_landing == routes.login {
            return Err(ContestHubError::Validation(
                "routes.default_landing cannot be the login path".to_string(),
            ));
        }

        if self.provider.max_login_attempts == 0 {
            return Err(ContestHubError::Validation(
                "provider.max_login_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
