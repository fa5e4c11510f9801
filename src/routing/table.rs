//! Route table: which page each path shows and which paths are protected.

use std::fmt;

use crate::config::RoutesConfig;

/// Pages the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Landing page.
    Home,
    /// Sign-in page.
    Login,
    /// Account creation page.
    Register,
    /// Contest dashboard (signed-in users only).
    Dashboard,
    /// Error page for unknown paths.
    NotFound,
}

impl Page {
    /// Get the page title.
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Login",
            Page::Register => "Register",
            Page::Dashboard => "Dashboard",
            Page::NotFound => "Page not found",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One path in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Exact path.
    pub path: String,
    /// Page shown at the path.
    pub page: Page,
    /// Whether the route sits behind the guard.
    pub protected: bool,
}

/// Path to page mapping with an error page fallback.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    fallback: RouteEntry,
}

impl RouteTable {
    /// Build the table from configured paths.
    pub fn from_config(routes: &RoutesConfig) -> Self {
        let entry = |path: &str, page, protected| RouteEntry {
            path: path.to_string(),
            page,
            protected,
        };

        Self {
            entries: vec![
                entry(&routes.home, Page::Home, false),
                entry(&routes.login, Page::Login, false),
                entry(&routes.register, Page::Register, false),
                entry(&routes.dashboard, Page::Dashboard, true),
            ],
            fallback: entry("*", Page::NotFound, false),
        }
    }

    /// Find the entry for `path`, or the error page.
    ///
    /// A trailing slash is ignored, so `/dashboard/` matches `/dashboard`.
    pub fn resolve(&self, path: &str) -> &RouteEntry {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        self.entries
            .iter()
            .find(|entry| entry.path == trimmed)
            .unwrap_or(&self.fallback)
    }

    /// Get the configured entries.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&RoutesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_paths() {
        let table = RouteTable::default();

        assert_eq!(table.resolve("/").page, Page::Home);
        assert_eq!(table.resolve("/login").page, Page::Login);
        assert_eq!(table.resolve("/register").page, Page::Register);
        assert_eq!(table.resolve("/dashboard").page, Page::Dashboard);
    }

    #[test]
    fn test_only_dashboard_protected() {
        let table = RouteTable::default();
        let protected: Vec<Page> = table
            .entries()
            .iter()
            .filter(|e| e.protected)
            .map(|e| e.page)
            .collect();

        assert_eq!(protected, vec![Page::Dashboard]);
    }

    #[test]
    fn test_trailing_slash() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/dashboard/").page, Page::Dashboard);
        assert_eq!(table.resolve("//").page, Page::Home);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let table = RouteTable::default();
        let entry = table.resolve("/contests/42");

        assert_eq!(entry.page, Page::NotFound);
        assert!(!entry.protected);
    }

    #[test]
    fn test_custom_paths() {
        let routes = RoutesConfig {
            dashboard: "/me".to_string(),
            ..RoutesConfig::default()
        };
        let table = RouteTable::from_config(&routes);

        assert_eq!(table.resolve("/me").page, Page::Dashboard);
        assert_eq!(table.resolve("/dashboard").page, Page::NotFound);
    }

    #[test]
    fn test_page_title() {
        assert_eq!(Page::Dashboard.to_string(), "Dashboard");
    }
}
