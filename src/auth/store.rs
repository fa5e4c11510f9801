//! Session store: the single source of truth for who is signed in.
//!
//! The store is the only registrant with the identity provider. Provider
//! pushes and confirmed store operations both funnel through one transition
//! path that updates the current [`AuthSession`] and fans it out to the
//! store's own subscribers.
//!
//! Transitions are serialized: for any one transition every subscriber is
//! called, in registration order, before the next transition is applied.
//! A transition to the state already held is dropped, so subscribers never
//! see the same state twice in a row.
//!
//! Provider notifications are numbered. An operation records the number
//! before calling the provider and confirms its own result only if no
//! notification arrived meanwhile; otherwise the latest notification stands.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info, warn};

use super::error::AuthError;
use super::provider::{IdentityProvider, ProfileUpdate, ProviderSubscription};
use super::registration::RegistrationRequest;
use super::session::{AuthSession, AuthUser};
use super::validation::validate_login;

type Listener = Arc<dyn Fn(&AuthSession) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the store, its subscriptions and the provider callback.
struct StoreInner {
    session: Mutex<AuthSession>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    /// Number of provider notifications received. Only changes while
    /// `dispatch` is held.
    generation: AtomicU64,
    /// Held while a transition is applied and delivered.
    dispatch: Mutex<()>,
}

impl StoreInner {
    fn new() -> Self {
        Self {
            session: Mutex::new(AuthSession::Unknown),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            generation: AtomicU64::new(0),
            dispatch: Mutex::new(()),
        }
    }

    fn current(&self) -> AuthSession {
        lock(&self.session).clone()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Apply a provider notification.
    fn notify(&self, next: AuthSession) {
        let _dispatch = lock(&self.dispatch);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.apply(next, "provider");
    }

    /// Apply an operation's own result unless a provider notification
    /// arrived after `since`. Returns the session the store holds afterwards.
    fn confirm(&self, next: AuthSession, since: u64, cause: &'static str) -> AuthSession {
        let _dispatch = lock(&self.dispatch);
        let generation = self.generation();
        if generation != since {
            let current = self.current();
            debug!(
                status = %current.status(),
                cause,
                since,
                generation,
                "Confirmation superseded by provider notification"
            );
            return current;
        }
        self.apply(next.clone(), cause);
        next
    }

    /// Update the session and notify subscribers. Caller holds `dispatch`.
    fn apply(&self, next: AuthSession, cause: &'static str) {
        {
            let mut session = lock(&self.session);
            if *session == next {
                debug!(status = %next.status(), cause, "Session unchanged");
                return;
            }
            *session = next.clone();
        }

        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        debug!(
            status = %next.status(),
            cause,
            subscribers = listeners.len(),
            "Session transition"
        );

        for listener in listeners {
            listener(&next);
        }
    }

    fn remove_listener(&self, id: u64) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}

/// Handle returned by [`SessionStore::subscribe`].
///
/// The listener stays registered until the handle is unsubscribed or dropped.
#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    inner: Weak<StoreInner>,
}

impl Subscription {
    /// Deregister the listener.
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.remove_listener(self.id) {
                debug!(listener_id = self.id, "Session listener removed");
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Process-wide holder of the current authentication state.
///
/// Create one with [`SessionStore::init`] at application start and pass the
/// returned `Arc` to whatever needs it. Listeners registered through
/// [`subscribe`](Self::subscribe) may read the store but must not call its
/// async operations synchronously from inside the callback.
pub struct SessionStore {
    inner: Arc<StoreInner>,
    provider: Arc<dyn IdentityProvider>,
    provider_subscription: Mutex<Option<ProviderSubscription>>,
}

impl SessionStore {
    /// Create the store and register it, once, with the provider.
    pub fn init(provider: Arc<dyn IdentityProvider>) -> Arc<Self> {
        let inner = Arc::new(StoreInner::new());

        let weak = Arc::downgrade(&inner);
        let subscription = provider.on_session_change(Arc::new(move |user: Option<AuthUser>| {
            if let Some(inner) = weak.upgrade() {
                inner.notify(AuthSession::from_provider(user));
            }
        }));

        info!("Session store initialized");

        Arc::new(Self {
            inner,
            provider,
            provider_subscription: Mutex::new(Some(subscription)),
        })
    }

    /// Get the latest known session. Never blocks on the provider.
    pub fn current_session(&self) -> AuthSession {
        self.inner.current()
    }

    /// Register a listener for every session transition.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthSession) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        debug!(listener_id = id, "Session listener added");

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Get the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Check if the provider subscription is still held.
    pub fn is_active(&self) -> bool {
        lock(&self.provider_subscription).is_some()
    }

    /// Sign in with email and password.
    ///
    /// Malformed input fails with [`AuthError::MalformedInput`] without
    /// contacting the provider. On success subscribers have been notified
    /// by the time this returns; on failure the state is unchanged. If the
    /// provider reported a newer change while the call was in flight, that
    /// change wins and its session is returned.
    pub async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        if let Err(e) = validate_login(email, password) {
            debug!(error = %e, "Credential sign-in rejected before provider call");
            return Err(e.into());
        }

        let since = self.inner.generation();
        match self.provider.verify_credentials(email, password).await {
            Ok(user) => {
                info!(uid = %user.uid, email = %email, "Credential sign-in successful");
                Ok(self
                    .inner
                    .confirm(AuthSession::Authenticated(user), since, "credentials"))
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Credential sign-in failed");
                Err(e)
            }
        }
    }

    /// Sign in through the provider-hosted interactive flow.
    pub async fn sign_in_with_federated_provider(&self) -> Result<AuthSession, AuthError> {
        let since = self.inner.generation();
        match self.provider.start_federated_flow().await {
            Ok(user) => {
                info!(uid = %user.uid, "Federated sign-in successful");
                Ok(self
                    .inner
                    .confirm(AuthSession::Authenticated(user), since, "federated"))
            }
            Err(AuthError::FlowAborted) => {
                info!("Federated sign-in cancelled by user");
                Err(AuthError::FlowAborted)
            }
            Err(e) => {
                warn!(error = %e, "Federated sign-in failed");
                Err(e)
            }
        }
    }

    /// Create an account, set its profile and sign it in.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<AuthSession, AuthError> {
        if let Err(e) = request.validate() {
            debug!(error = %e, "Registration rejected before provider call");
            return Err(e.into());
        }

        let created = self
            .provider
            .create_account(&request.email, &request.password)
            .await
            .inspect_err(|e| warn!(email = %request.email, error = %e, "Account creation failed"))?;

        // The provider has reported the new account by now
        let since = self.inner.generation();
        let update = ProfileUpdate {
            display_name: Some(request.display_name.clone()),
            photo_url: request.photo_url.clone().filter(|url| !url.is_empty()),
        };
        let user = self
            .provider
            .update_profile(&created.uid, update)
            .await
            .inspect_err(|e| warn!(uid = %created.uid, error = %e, "Profile update failed"))?;

        info!(uid = %user.uid, email = %request.email, "Registration successful");

        Ok(self
            .inner
            .confirm(AuthSession::Authenticated(user), since, "registration"))
    }

    /// Sign out.
    ///
    /// Already unauthenticated: resolves immediately without contacting the
    /// provider or notifying anyone.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if self.current_session() == AuthSession::Unauthenticated {
            debug!("Sign-out skipped: no active session");
            return Ok(());
        }

        let since = self.inner.generation();
        if let Err(e) = self.provider.terminate_session().await {
            warn!(error = %e, "Sign-out failed");
            return Err(e);
        }

        info!("Signed out");
        self.inner
            .confirm(AuthSession::Unauthenticated, since, "sign_out");
        Ok(())
    }

    /// Release the provider subscription. Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(subscription) = lock(&self.provider_subscription).take() {
            subscription.release();
            info!("Session store disposed");
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.current_session())
            .field("listeners", &self.listener_count())
            .field("active", &self.is_active())
            .finish()
    }
}
