//! ContestHub - client session core
//!
//! Tracks who is signed in, keeps protected routes behind a login gate and
//! returns users to where they were headed once they sign in.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod pages;
pub mod routing;

pub use app::{Application, Screen};
pub use auth::{
    AuthError, AuthSession, AuthStatus, AuthUser, FederatedIdentity, FederatedOutcome,
    IdentityProvider, MemoryIdentityProvider, ProfileUpdate, ProviderSubscription,
    RegistrationRequest, SessionStore, Subscription, ValidationError,
};
pub use config::Config;
pub use error::{ContestHubError, Result};
pub use pages::{LoginForm, LoginPage, LoginSuccess, Notice, NoticeLevel, RegisterPage};
pub use routing::{
    GuardDecision, History, Location, NavigationIntent, NavigationMode, NavigationRequest, Page,
    RouteGuard, RouteTable,
};
