//! Where the user was headed before being sent to sign in.

use std::fmt;

/// Location a user attempted to reach while signed out.
///
/// Created when the guard diverts to the login page, carried as that
/// location's state, and taken by the login page once sign-in succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    /// Path of the protected page.
    pub target_path: String,
}

impl NavigationIntent {
    /// Create an intent for a path.
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
        }
    }
}

impl fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target_path)
    }
}
