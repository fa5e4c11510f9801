//! Authentication module for ContestHub.
//!
//! This module provides the session store, the identity provider boundary,
//! an in-memory provider, input validation and password hashing.

mod error;
mod limiter;
mod memory;
mod password;
mod provider;
mod registration;
mod session;
mod store;
pub mod validation;

pub use error::AuthError;
pub use limiter::{LimitResult, LoginLimiter};
pub use memory::{FederatedIdentity, FederatedOutcome, MemoryIdentityProvider};
pub use password::{validate_password, verify_password, CredentialHasher, PasswordError};
pub use provider::{IdentityProvider, ProfileUpdate, ProviderSubscription, SessionChangeCallback};
pub use registration::RegistrationRequest;
pub use session::{AuthSession, AuthStatus, AuthUser};
pub use store::{SessionStore, Subscription};
pub use validation::ValidationError;
