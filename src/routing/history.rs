//! In-memory browser history.

use std::fmt;

use super::intent::NavigationIntent;

/// An entry in the history stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Route path.
    pub path: String,
    /// State attached by whoever navigated here.
    pub state: Option<NavigationIntent>,
}

impl Location {
    /// Create a location without state.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }

    /// Attach a navigation intent.
    pub fn with_intent(mut self, intent: NavigationIntent) -> Self {
        self.state = Some(intent);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Add a new entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// A navigation to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Destination path.
    pub to: String,
    /// Push or replace.
    pub mode: NavigationMode,
    /// State to attach to the destination.
    pub intent: Option<NavigationIntent>,
}

impl NavigationRequest {
    /// Navigate by adding an entry.
    pub fn push(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            mode: NavigationMode::Push,
            intent: None,
        }
    }

    /// Navigate by overwriting the current entry.
    pub fn replace(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            mode: NavigationMode::Replace,
            intent: None,
        }
    }

    /// Attach an intent to the destination.
    pub fn with_intent(mut self, intent: NavigationIntent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Build the location this request leads to.
    pub fn location(&self) -> Location {
        Location {
            path: self.to.clone(),
            state: self.intent.clone(),
        }
    }
}

/// History stack with a cursor.
///
/// Pushing discards any entries after the cursor, like a browser does.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    /// Create a history starting at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            entries: vec![Location::new(path)],
            index: 0,
        }
    }

    /// Get the current location.
    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Add a location after the current one.
    pub fn push(&mut self, location: Location) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    /// Overwrite the current location.
    pub fn replace(&mut self, location: Location) {
        self.entries[self.index] = location;
    }

    /// Apply a navigation request and return the new current location.
    pub fn apply(&mut self, request: &NavigationRequest) -> &Location {
        match request.mode {
            NavigationMode::Push => self.push(request.location()),
            NavigationMode::Replace => self.replace(request.location()),
        }
        self.current()
    }

    /// Go back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Go forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history() {
        let history = History::new("/");
        assert_eq!(history.current().path, "/");
        assert!(history.current().state.is_none());
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }

    #[test]
    fn test_push_and_back() {
        let mut history = History::new("/");
        history.push(Location::new("/register"));

        assert_eq!(history.current().path, "/register");
        assert!(history.back());
        assert_eq!(history.current().path, "/");
        assert!(!history.back());
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = History::new("/");
        history.push(Location::new("/dashboard"));
        history.replace(Location::new("/login").with_intent(NavigationIntent::new("/dashboard")));

        assert_eq!(history.len(), 2);
        assert_eq!(history.current().path, "/login");
        assert!(history.back());
        assert_eq!(history.current().path, "/");
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut history = History::new("/");
        history.push(Location::new("/login"));
        history.push(Location::new("/register"));
        history.back();
        history.back();

        history.push(Location::new("/dashboard"));

        assert_eq!(history.len(), 2);
        assert!(!history.forward());
    }

    #[test]
    fn test_forward() {
        let mut history = History::new("/");
        history.push(Location::new("/login"));
        history.back();

        assert!(history.forward());
        assert_eq!(history.current().path, "/login");
    }

    #[test]
    fn test_apply_request() {
        let mut history = History::new("/");

        let location = history
            .apply(&NavigationRequest::push("/dashboard"))
            .clone();
        assert_eq!(location.path, "/dashboard");

        let request =
            NavigationRequest::replace("/login").with_intent(NavigationIntent::new("/dashboard"));
        let location = history.apply(&request).clone();

        assert_eq!(location.path, "/login");
        assert_eq!(location.state, Some(NavigationIntent::new("/dashboard")));
        assert_eq!(history.len(), 2);
    }
}
