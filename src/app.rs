//! Application shell.
//!
//! Owns the session store, route table and history, and decides what the
//! current location shows. The shell subscribes to the store and settles
//! the current location on every session transition, so a protected page
//! whose session ends is diverted to login without any user action.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::auth::{AuthError, AuthSession, SessionStore, Subscription};
use crate::config::RoutesConfig;
use crate::pages::{LoginPage, RegisterPage};
use crate::routing::{
    GuardDecision, History, Location, NavigationRequest, Page, RouteGuard, RouteTable,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What the shell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Session still resolving.
    Loading,
    /// A page.
    Page(Page),
}

/// Routing state shared with the store listener.
struct Shell {
    table: RouteTable,
    guard: RouteGuard,
    history: Mutex<History>,
    screen: Mutex<Screen>,
}

impl Shell {
    /// Resolve the current location for `session`, following a guard
    /// redirect if there is one, and record the resulting screen.
    fn settle(&self, session: &AuthSession) -> Screen {
        let mut history = lock(&self.history);
        let location = history.current().clone();
        let entry = self.table.resolve(&location.path);

        let screen = if entry.protected {
            match self.guard.evaluate(session, &location, entry.page) {
                GuardDecision::Loading => Screen::Loading,
                GuardDecision::Render(page) => Screen::Page(page),
                GuardDecision::Redirect(request) => {
                    let target = history.apply(&request);
                    info!(from = %location.path, to = %target.path, "Redirected to login");
                    Screen::Page(self.table.resolve(&target.path).page)
                }
            }
        } else {
            Screen::Page(entry.page)
        };

        *lock(&self.screen) = screen;
        screen
    }
}

/// The application: a session store plus client-side routing.
pub struct Application {
    store: Arc<SessionStore>,
    routes: RoutesConfig,
    shell: Arc<Shell>,
    subscription: Option<Subscription>,
}

impl Application {
    /// Create the shell at the home path and start following the store.
    pub fn new(store: Arc<SessionStore>, routes: RoutesConfig) -> Self {
        let shell = Arc::new(Shell {
            table: RouteTable::from_config(&routes),
            guard: RouteGuard::new(&routes.login),
            history: Mutex::new(History::new(&routes.home)),
            screen: Mutex::new(Screen::Loading),
        });
        shell.settle(&store.current_session());

        let listener = Arc::clone(&shell);
        let subscription = store.subscribe(move |session| {
            let screen = listener.settle(session);
            debug!(status = %session.status(), ?screen, "Re-rendered after session change");
        });

        info!(home = %routes.home, "Application started");

        Self {
            store,
            routes,
            shell,
            subscription: Some(subscription),
        }
    }

    /// Get the session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Get the route configuration.
    pub fn routes(&self) -> &RoutesConfig {
        &self.routes
    }

    /// Get the current location.
    pub fn location(&self) -> Location {
        lock(&self.shell.history).current().clone()
    }

    /// Get the number of history entries.
    pub fn history_len(&self) -> usize {
        lock(&self.shell.history).len()
    }

    /// Get the last rendered screen.
    pub fn screen(&self) -> Screen {
        *lock(&self.shell.screen)
    }

    /// Render the current location against the current session.
    pub fn render(&self) -> Screen {
        self.shell.settle(&self.store.current_session())
    }

    /// Visit `path` as a new history entry.
    pub fn navigate(&self, path: &str) -> Screen {
        info!(path = %path, "Navigate");
        lock(&self.shell.history).push(Location::new(path));
        self.render()
    }

    /// Perform a navigation produced by a page.
    pub fn follow(&self, request: &NavigationRequest) -> Screen {
        info!(to = %request.to, mode = ?request.mode, "Follow navigation");
        lock(&self.shell.history).apply(request);
        self.render()
    }

    /// Go back one history entry. Stays put at the start of history.
    pub fn back(&self) -> Screen {
        if !lock(&self.shell.history).back() {
            debug!("Back ignored: at start of history");
        }
        self.render()
    }

    /// Open the login page for the current location.
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(Arc::clone(&self.store), &self.routes, &self.location())
    }

    /// Open the registration page.
    pub fn register_page(&self) -> RegisterPage {
        RegisterPage::new(Arc::clone(&self.store), &self.routes)
    }

    /// Sign the current user out. The shell re-renders through its
    /// subscription.
    pub async fn sign_out(&self) -> Result<Screen, AuthError> {
        self.store.sign_out().await?;
        Ok(self.screen())
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.store.dispose();
        info!("Application stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryIdentityProvider;
    use crate::config::ProviderConfig;
    use crate::pages::LoginForm;

    fn setup() -> (Arc<MemoryIdentityProvider>, Application) {
        let config = ProviderConfig {
            hash_memory_kib: 1024,
            hash_iterations: 1,
            ..ProviderConfig::default()
        };
        let provider = Arc::new(MemoryIdentityProvider::new(&config).unwrap());
        provider
            .add_account("ada@example.com", "Engine1843", "Ada")
            .unwrap();
        let store = SessionStore::init(provider.clone());
        let app = Application::new(store, RoutesConfig::default());
        (provider, app)
    }

    #[test]
    fn test_starts_at_home() {
        let (_provider, app) = setup();
        assert_eq!(app.screen(), Screen::Page(Page::Home));
        assert_eq!(app.location().path, "/");
    }

    #[test]
    fn test_protected_page_loading_until_resolved() {
        let (provider, app) = setup();

        assert_eq!(app.navigate("/dashboard"), Screen::Loading);
        assert_eq!(app.render(), Screen::Loading);
        assert_eq!(app.location().path, "/dashboard");

        provider.announce();

        assert_eq!(app.screen(), Screen::Page(Page::Login));
        assert_eq!(app.location().path, "/login");
    }

    #[test]
    fn test_unknown_path_shows_error_page() {
        let (_provider, app) = setup();
        assert_eq!(app.navigate("/nowhere"), Screen::Page(Page::NotFound));
    }

    #[tokio::test]
    async fn test_sign_out_on_dashboard_diverts() {
        let (provider, app) = setup();
        provider.announce();
        app.navigate("/dashboard");
        let mut page = app.login_page();
        let success = page
            .submit(&LoginForm::new("ada@example.com", "Engine1843"))
            .await
            .unwrap();
        assert_eq!(app.follow(&success.navigation), Screen::Page(Page::Dashboard));

        let screen = app.sign_out().await.unwrap();

        assert_eq!(screen, Screen::Page(Page::Login));
    }

    #[test]
    fn test_drop_disposes_store() {
        let (_provider, app) = setup();
        let store = Arc::clone(app.store());
        assert_eq!(store.listener_count(), 1);

        drop(app);

        assert_eq!(store.listener_count(), 0);
        assert!(!store.is_active());
    }
}
