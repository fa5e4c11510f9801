//! Test helpers for integration tests.
//!
//! Provides provider fixtures, a call-counting provider wrapper, and a
//! gated provider whose operations resolve only when the test says so.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use contesthub::auth::SessionChangeCallback;
use contesthub::config::ProviderConfig;
use contesthub::{
    AuthError, AuthSession, AuthUser, IdentityProvider, MemoryIdentityProvider, ProfileUpdate,
    ProviderSubscription, SessionStore, Subscription,
};

/// Seeded account email.
pub const ADA_EMAIL: &str = "ada@example.com";

/// Seeded account password.
pub const ADA_PASSWORD: &str = "Engine1843";

/// Provider configuration with cheap hashing.
pub fn fast_provider_config() -> ProviderConfig {
    ProviderConfig {
        hash_memory_kib: 1024,
        hash_iterations: 1,
        max_login_attempts: 3,
        ..ProviderConfig::default()
    }
}

/// In-memory provider with Ada's account.
pub fn memory_provider() -> Arc<MemoryIdentityProvider> {
    let provider = Arc::new(MemoryIdentityProvider::new(&fast_provider_config()).unwrap());
    provider
        .add_account(ADA_EMAIL, ADA_PASSWORD, "Ada")
        .unwrap();
    provider
}

/// Subscribe a recorder that keeps every session the store broadcasts.
pub fn record(store: &SessionStore) -> (Arc<Mutex<Vec<AuthSession>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |session| sink.lock().unwrap().push(session.clone()));
    (seen, subscription)
}

/// Check the session invariant: a user is present iff authenticated.
pub fn is_whole(session: &AuthSession) -> bool {
    session.user().is_some() == session.is_authenticated()
}

/// Provider wrapper that counts calls, registrations and releases.
pub struct CountingProvider {
    inner: Arc<MemoryIdentityProvider>,
    calls: AtomicUsize,
    registrations: AtomicUsize,
    releases: Arc<AtomicUsize>,
}

impl CountingProvider {
    /// Wrap an in-memory provider.
    pub fn new(inner: Arc<MemoryIdentityProvider>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            registrations: AtomicUsize::new(0),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the wrapped provider.
    pub fn inner(&self) -> &Arc<MemoryIdentityProvider> {
        &self.inner
    }

    /// Number of async operations invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of session-change registrations.
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    /// Number of released registrations.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for CountingProvider {
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.count();
        self.inner.verify_credentials(email, password).await
    }

    async fn start_federated_flow(&self) -> Result<AuthUser, AuthError> {
        self.count();
        self.inner.start_federated_flow().await
    }

    async fn terminate_session(&self) -> Result<(), AuthError> {
        self.count();
        self.inner.terminate_session().await
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.count();
        self.inner.create_account(email, password).await
    }

    async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<AuthUser, AuthError> {
        self.count();
        self.inner.update_profile(uid, update).await
    }

    fn on_session_change(&self, callback: SessionChangeCallback) -> ProviderSubscription {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.on_session_change(callback);
        let releases = Arc::clone(&self.releases);
        ProviderSubscription::new(move || {
            releases.fetch_add(1, Ordering::SeqCst);
            inner.release();
        })
    }
}

/// Provider whose federated flow and sign-out wait for a gate.
///
/// Each operation pushes its result to the registered callback when it
/// resolves, like a hosted provider does.
#[derive(Default)]
pub struct GatedProvider {
    callback: Mutex<Option<SessionChangeCallback>>,
    federated_gate: Notify,
    terminate_gate: Notify,
}

impl GatedProvider {
    /// User returned by the federated flow.
    pub fn federated_user() -> AuthUser {
        AuthUser::new("uid-grace", "Grace").with_email("grace@example.com")
    }

    /// Let the pending federated flow resolve.
    pub fn open_federated(&self) {
        self.federated_gate.notify_one();
    }

    /// Let the pending sign-out resolve.
    pub fn open_terminate(&self) {
        self.terminate_gate.notify_one();
    }

    fn push(&self, user: Option<AuthUser>) {
        let callback = self.callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(user);
        }
    }
}

#[async_trait]
impl IdentityProvider for GatedProvider {
    async fn verify_credentials(&self, email: &str, _password: &str) -> Result<AuthUser, AuthError> {
        let user = AuthUser::new("uid-ada", "Ada").with_email(email);
        self.push(Some(user.clone()));
        Ok(user)
    }

    async fn start_federated_flow(&self) -> Result<AuthUser, AuthError> {
        self.federated_gate.notified().await;
        let user = Self::federated_user();
        self.push(Some(user.clone()));
        Ok(user)
    }

    async fn terminate_session(&self) -> Result<(), AuthError> {
        self.terminate_gate.notified().await;
        self.push(None);
        Ok(())
    }

    async fn create_account(&self, _email: &str, _password: &str) -> Result<AuthUser, AuthError> {
        Err(AuthError::ProviderUnavailable("not supported".to_string()))
    }

    async fn update_profile(&self, _uid: &str, _update: ProfileUpdate) -> Result<AuthUser, AuthError> {
        Err(AuthError::ProviderUnavailable("not supported".to_string()))
    }

    fn on_session_change(&self, callback: SessionChangeCallback) -> ProviderSubscription {
        *self.callback.lock().unwrap() = Some(callback);
        ProviderSubscription::new(|| {})
    }
}

/// Provider that reports a sign-in or sign-out as soon as it starts, then
/// waits for a gate before the call returns.
#[derive(Default)]
pub struct LaggingProvider {
    callback: Mutex<Option<SessionChangeCallback>>,
    gate: Notify,
}

impl LaggingProvider {
    /// Let the pending call return.
    pub fn open(&self) {
        self.gate.notify_one();
    }

    /// Report a session change that did not come from a store call, such
    /// as a token invalidation or a sign-in in another tab.
    pub fn push(&self, user: Option<AuthUser>) {
        let callback = self.callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(user);
        }
    }
}

#[async_trait]
impl IdentityProvider for LaggingProvider {
    async fn verify_credentials(&self, email: &str, _password: &str) -> Result<AuthUser, AuthError> {
        let user = AuthUser::new("uid-ada", "Ada").with_email(email);
        self.push(Some(user.clone()));
        self.gate.notified().await;
        Ok(user)
    }

    async fn start_federated_flow(&self) -> Result<AuthUser, AuthError> {
        let user = GatedProvider::federated_user();
        self.push(Some(user.clone()));
        self.gate.notified().await;
        Ok(user)
    }

    async fn terminate_session(&self) -> Result<(), AuthError> {
        self.push(None);
        self.gate.notified().await;
        Ok(())
    }

    async fn create_account(&self, _email: &str, _password: &str) -> Result<AuthUser, AuthError> {
        Err(AuthError::ProviderUnavailable("not supported".to_string()))
    }

    async fn update_profile(&self, _uid: &str, _update: ProfileUpdate) -> Result<AuthUser, AuthError> {
        Err(AuthError::ProviderUnavailable("not supported".to_string()))
    }

    fn on_session_change(&self, callback: SessionChangeCallback) -> ProviderSubscription {
        *self.callback.lock().unwrap() = Some(callback);
        ProviderSubscription::new(|| {})
    }
}

/// Yield to spawned tasks until `store` reaches `status`.
pub async fn wait_for_status(store: &SessionStore, status: contesthub::AuthStatus) {
    while store.current_session().status() != status {
        tokio::task::yield_now().await;
    }
}
