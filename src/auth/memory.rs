//! In-memory identity provider for development and tests.
//!
//! Behaves like a hosted provider from the store's point of view: answers
//! calls asynchronously and pushes every session change to registered
//! callbacks. Federated sign-in is scripted with [`FederatedOutcome`]s.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::AuthError;
use super::limiter::{LimitResult, LoginLimiter};
use super::password::{verify_password, CredentialHasher, PasswordError};
use super::provider::{IdentityProvider, ProfileUpdate, ProviderSubscription, SessionChangeCallback};
use super::session::AuthUser;
use crate::config::ProviderConfig;

type CallbackList = Vec<(u64, SessionChangeCallback)>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identity returned by the federated consent screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    /// Subject identifier at the federated provider.
    pub subject: String,
    /// Name shared by the federated provider.
    pub display_name: String,
    /// Email shared by the federated provider.
    pub email: Option<String>,
    /// Avatar shared by the federated provider.
    pub photo_url: Option<String>,
}

impl FederatedIdentity {
    /// Create an identity with a subject and a name.
    pub fn new(subject: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            email: None,
            photo_url: None,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// What the user does in the next federated flow.
#[derive(Debug, Clone)]
pub enum FederatedOutcome {
    /// User grants consent.
    Approve(FederatedIdentity),
    /// User closes the popup.
    Cancel,
    /// Federated provider fails.
    Fail(String),
}

#[derive(Debug)]
struct Account {
    user: AuthUser,
    password_hash: String,
    disabled: bool,
}

#[derive(Debug)]
struct ProviderState {
    /// Password accounts by lower-cased email.
    accounts: HashMap<String, Account>,
    /// Federated accounts by subject.
    federated: HashMap<String, AuthUser>,
    current: Option<AuthUser>,
    limiter: LoginLimiter,
    script: VecDeque<FederatedOutcome>,
    available: bool,
}

impl ProviderState {
    fn find_user_mut(&mut self, uid: &str) -> Option<&mut AuthUser> {
        if let Some(account) = self.accounts.values_mut().find(|a| a.user.uid == uid) {
            return Some(&mut account.user);
        }
        self.federated.values_mut().find(|u| u.uid == uid)
    }
}

/// In-memory [`IdentityProvider`].
pub struct MemoryIdentityProvider {
    state: Mutex<ProviderState>,
    callbacks: Arc<Mutex<CallbackList>>,
    next_callback_id: AtomicU64,
    hasher: CredentialHasher,
    federated_name: String,
}

impl MemoryIdentityProvider {
    /// Create a provider from configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, PasswordError> {
        Ok(Self {
            state: Mutex::new(ProviderState {
                accounts: HashMap::new(),
                federated: HashMap::new(),
                current: None,
                limiter: LoginLimiter::from_config(config),
                script: VecDeque::new(),
                available: true,
            }),
            callbacks: Arc::new(Mutex::new(Vec::new())),
            next_callback_id: AtomicU64::new(1),
            hasher: CredentialHasher::from_config(config)?,
            federated_name: config.federated_provider.clone(),
        })
    }

    /// Get the name of the federated provider shown on sign-in buttons.
    pub fn federated_name(&self) -> &str {
        &self.federated_name
    }

    /// Seed a password account without signing it in.
    pub fn add_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, AuthError> {
        let key = email.to_lowercase();
        if lock(&self.state).accounts.contains_key(&key) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let password_hash = self.hash(password)?;
        let user = AuthUser::new(Uuid::new_v4().to_string(), display_name).with_email(email);

        let mut state = lock(&self.state);
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        state.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password_hash,
                disabled: false,
            },
        );
        debug!(email = %email, uid = %user.uid, "Account added");
        Ok(user)
    }

    /// Block or unblock an account. Returns false if no such account exists.
    pub fn set_account_disabled(&self, email: &str, disabled: bool) -> bool {
        match lock(&self.state).accounts.get_mut(&email.to_lowercase()) {
            Some(account) => {
                account.disabled = disabled;
                true
            }
            None => false,
        }
    }

    /// Queue the outcome of the next federated flow.
    pub fn queue_federated(&self, outcome: FederatedOutcome) {
        lock(&self.state).script.push_back(outcome);
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        lock(&self.state).available = available;
    }

    /// Get the provider-side signed-in user.
    pub fn current_user(&self) -> Option<AuthUser> {
        lock(&self.state).current.clone()
    }

    /// Get the number of registered session-change callbacks.
    pub fn callback_count(&self) -> usize {
        lock(&self.callbacks).len()
    }

    /// Report the current session to every callback, as a hosted provider
    /// does once it has restored its persisted session at startup.
    pub fn announce(&self) {
        let current = self.current_user();
        debug!(signed_in = current.is_some(), "Announcing session state");
        self.push(current);
    }

    /// Invalidate the provider session (token expiry, remote revocation).
    pub fn expire_session(&self) {
        let expired = lock(&self.state).current.take();
        if let Some(user) = expired {
            info!(uid = %user.uid, "Provider session expired");
            self.push(None);
        }
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.hasher.hash(password).map_err(|e| match e {
            PasswordError::TooShort | PasswordError::TooLong => {
                AuthError::WeakPassword(e.to_string())
            }
            other => AuthError::ProviderUnavailable(other.to_string()),
        })
    }

    fn ensure_available(&self) -> Result<(), AuthError> {
        if lock(&self.state).available {
            Ok(())
        } else {
            Err(AuthError::ProviderUnavailable(
                "identity provider is offline".to_string(),
            ))
        }
    }

    /// Record `user` as signed in and notify callbacks.
    fn sign_in(&self, user: AuthUser) {
        lock(&self.state).current = Some(user.clone());
        self.push(Some(user));
    }

    fn push(&self, user: Option<AuthUser>) {
        let callbacks: Vec<SessionChangeCallback> = lock(&self.callbacks)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(user.clone());
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        self.ensure_available()?;

        let (user, password_hash) = {
            let mut state = lock(&self.state);

            if let LimitResult::Locked(remaining) = state.limiter.check(email) {
                warn!(
                    email = %email,
                    remaining_secs = remaining.as_secs(),
                    "Sign-in blocked: account locked"
                );
                return Err(AuthError::TooManyAttempts {
                    retry_after_secs: remaining.as_secs().max(1),
                });
            }

            let found = state
                .accounts
                .get(&email.to_lowercase())
                .map(|a| (a.user.clone(), a.password_hash.clone(), a.disabled));

            match found {
                None => {
                    state.limiter.record_failure(email);
                    warn!(email = %email, "Sign-in failed: unknown account");
                    return Err(AuthError::InvalidCredentials);
                }
                Some((_, _, true)) => {
                    warn!(email = %email, "Sign-in failed: account disabled");
                    return Err(AuthError::AccountDisabled);
                }
                Some((user, password_hash, false)) => (user, password_hash),
            }
        };

        if verify_password(password, &password_hash).is_err() {
            lock(&self.state).limiter.record_failure(email);
            warn!(email = %email, "Sign-in failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        lock(&self.state).limiter.clear(email);
        self.sign_in(user.clone());
        Ok(user)
    }

    async fn start_federated_flow(&self) -> Result<AuthUser, AuthError> {
        self.ensure_available()?;
        debug!(provider = %self.federated_name, "Federated flow started");

        // An empty script means the user closed the popup
        let outcome = lock(&self.state)
            .script
            .pop_front()
            .unwrap_or(FederatedOutcome::Cancel);

        let identity = match outcome {
            FederatedOutcome::Approve(identity) => identity,
            FederatedOutcome::Cancel => return Err(AuthError::FlowAborted),
            FederatedOutcome::Fail(reason) => return Err(AuthError::ProviderUnavailable(reason)),
        };

        let user = {
            let mut state = lock(&self.state);
            state
                .federated
                .entry(identity.subject.clone())
                .or_insert_with(|| {
                    let mut user = AuthUser::new(Uuid::new_v4().to_string(), &identity.display_name);
                    user.email = identity.email.clone();
                    user.photo_url = identity.photo_url.clone();
                    user
                })
                .clone()
        };

        self.sign_in(user.clone());
        Ok(user)
    }

    async fn terminate_session(&self) -> Result<(), AuthError> {
        self.ensure_available()?;

        let previous = lock(&self.state).current.take();
        if previous.is_some() {
            self.push(None);
        }
        Ok(())
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.ensure_available()?;

        let display_name = email.split('@').next().unwrap_or(email);
        let user = self.add_account(email, password, display_name)?;
        info!(email = %email, uid = %user.uid, "Account created");

        self.sign_in(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<AuthUser, AuthError> {
        self.ensure_available()?;

        let mut state = lock(&self.state);
        let user = state
            .find_user_mut(uid)
            .ok_or_else(|| AuthError::ProviderUnavailable(format!("no account with uid {uid}")))?;

        if let Some(display_name) = update.display_name {
            user.display_name = display_name;
        }
        if let Some(photo_url) = update.photo_url {
            user.photo_url = Some(photo_url);
        }
        let updated = user.clone();

        if state.current.as_ref().is_some_and(|u| u.uid == uid) {
            state.current = Some(updated.clone());
        }

        Ok(updated)
    }

    fn on_session_change(&self, callback: SessionChangeCallback) -> ProviderSubscription {
        let id = self.next_callback_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.callbacks).push((id, callback));
        debug!(callback_id = id, "Session callback registered");

        let callbacks = Arc::downgrade(&self.callbacks);
        ProviderSubscription::new(move || {
            if let Some(callbacks) = callbacks.upgrade() {
                lock(&callbacks).retain(|(callback_id, _)| *callback_id != id);
                debug!(callback_id = id, "Session callback released");
            }
        })
    }
}
