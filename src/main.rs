use std::sync::Arc;

use tracing::{error, info, warn};

use contesthub::{
    Application, Config, LoginForm, MemoryIdentityProvider, Notice, Screen, SessionStore,
};

const DEMO_EMAIL: &str = "ada@example.com";
const DEMO_PASSWORD: &str = "Engine1843";

#[tokio::main]
async fn main() {
    // Load configuration
    let (config, load_error) = Config::load_or_default("config.toml");
    if let Some(e) = &load_error {
        eprintln!("Failed to load config.toml: {e}");
        eprintln!("Using default configuration.");
    }

    // Initialize logging
    if let Err(e) = contesthub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        contesthub::logging::init_console_only(&config.logging.level);
    }

    info!("ContestHub - client session core");

    if let Err(e) = run(config).await {
        error!(error = %e, "Demo aborted");
        std::process::exit(1);
    }
}

/// Walk the protected-route detour against the in-memory provider.
async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let provider = Arc::new(MemoryIdentityProvider::new(&config.provider)?);
    provider.add_account(DEMO_EMAIL, DEMO_PASSWORD, "Ada")?;
    info!(federated = %provider.federated_name(), "Development identity provider ready");

    let store = SessionStore::init(provider.clone());
    let app = Application::new(store, config.routes.clone());

    // Restore (empty) persisted session
    provider.announce();
    info!(status = %app.store().current_session().status(), "Session resolved");

    let screen = app.navigate(&config.routes.dashboard);
    info!(?screen, location = %app.location(), "Visited protected page");

    let mut login = app.login_page();
    if let Some(intent) = login.intent() {
        info!(target = %intent, "Login will return to");
    }

    let wrong = LoginForm::new(DEMO_EMAIL, "Wrong1843");
    if let Err(e) = login.submit(&wrong).await {
        let notice = Notice::from_error(&e);
        warn!(message = %notice.message, "Login rejected");
    }

    let success = login.submit(&LoginForm::new(DEMO_EMAIL, DEMO_PASSWORD)).await?;
    info!(message = %success.notice.message, "Login accepted");

    let screen = app.follow(&success.navigation);
    info!(?screen, location = %app.location(), "Returned after login");

    let screen = app.sign_out().await?;
    info!(?screen, location = %app.location(), "Signed out");

    if screen != Screen::Page(contesthub::Page::Login) {
        warn!(?screen, "Expected the login page after signing out");
    }

    Ok(())
}
