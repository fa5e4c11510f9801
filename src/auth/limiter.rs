//! Failed sign-in throttling for the development identity provider.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ProviderConfig;

/// Result of a sign-in attempt rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitResult {
    /// Attempt is allowed.
    Allowed,
    /// Account is locked for the specified duration.
    Locked(Duration),
}

/// Sign-in attempt rate limiter.
///
/// Tracks failed attempts per email and locks the account out after too
/// many failures inside the window.
#[derive(Debug)]
pub struct LoginLimiter {
    /// Failed attempts per email (lower-cased).
    attempts: HashMap<String, Vec<Instant>>,
    /// Maximum attempts before lockout.
    max_attempts: u32,
    /// Time window for counting attempts.
    window: Duration,
    /// Lockout duration after exceeding max attempts.
    lockout: Duration,
}

impl LoginLimiter {
    /// Create a limiter with custom settings.
    pub fn with_config(max_attempts: u32, window_secs: u64, lockout_secs: u64) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            window: Duration::from_secs(window_secs),
            lockout: Duration::from_secs(lockout_secs),
        }
    }

    /// Create a limiter from the provider configuration.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::with_config(
            config.max_login_attempts,
            config.lockout_secs,
            config.lockout_secs,
        )
    }

    /// Check if an attempt is allowed for the given email.
    pub fn check(&mut self, email: &str) -> LimitResult {
        let now = Instant::now();
        let key = email.to_lowercase();
        let Some(attempts) = self.attempts.get_mut(&key) else {
            return LimitResult::Allowed;
        };

        attempts.retain(|t| now.duration_since(*t) < self.window);

        if attempts.len() >= self.max_attempts as usize {
            if let Some(oldest) = attempts.first() {
                let elapsed = now.duration_since(*oldest);
                if elapsed < self.lockout {
                    return LimitResult::Locked(self.lockout - elapsed);
                }
                // Lockout expired
                attempts.clear();
            }
        }

        if attempts.is_empty() {
            self.attempts.remove(&key);
        }
        LimitResult::Allowed
    }

    /// Record a failed attempt.
    pub fn record_failure(&mut self, email: &str) {
        let now = Instant::now();
        let attempts = self.attempts.entry(email.to_lowercase()).or_default();

        attempts.retain(|t| now.duration_since(*t) < self.window);
        attempts.push(now);

        debug!(
            email = %email,
            attempt_count = attempts.len(),
            "Recorded failed sign-in attempt"
        );
    }

    /// Clear all attempts for an email (call on successful sign-in).
    pub fn clear(&mut self, email: &str) {
        self.attempts.remove(&email.to_lowercase());
    }

    /// Get the number of recent failed attempts for an email.
    pub fn attempt_count(&mut self, email: &str) -> usize {
        let now = Instant::now();
        let key = email.to_lowercase();
        let Some(attempts) = self.attempts.get_mut(&key) else {
            return 0;
        };

        attempts.retain(|t| now.duration_since(*t) < self.window);
        let count = attempts.len();
        if count == 0 {
            self.attempts.remove(&key);
        }
        count
    }

    /// Get the number of emails with failures on record.
    pub fn tracked_count(&self) -> usize {
        self.attempts.len()
    }
}
