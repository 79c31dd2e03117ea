//! Presentation interface driven by the event router.

/// Display surface for the chat log and the roster of online users.
///
/// Implementations must not fail: the router calls these for every event and
/// has no way to report a rendering problem.
pub trait Presentation {
    /// Append text to the chat log. `text` carries its own trailing newline.
    fn append_log_line(&mut self, text: &str);

    /// Add a user to the roster. Adding a present user is a no-op.
    fn add_roster_entry(&mut self, user: &str);

    /// Remove a user from the roster. Removing an absent user is a no-op.
    fn remove_roster_entry(&mut self, user: &str);

    /// Keep the newest log line in view.
    fn scroll_to_bottom(&mut self) {}
}

impl<P: Presentation + ?Sized> Presentation for &mut P {
    fn append_log_line(&mut self, text: &str) {
        (**self).append_log_line(text);
    }

    fn add_roster_entry(&mut self, user: &str) {
        (**self).add_roster_entry(user);
    }

    fn remove_roster_entry(&mut self, user: &str) {
        (**self).remove_roster_entry(user);
    }

    fn scroll_to_bottom(&mut self) {
        (**self).scroll_to_bottom();
    }
}

/// Users currently online, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    users: Vec<String>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Returns `false` if the user was already present.
    pub fn insert(&mut self, user: &str) -> bool {
        if self.contains(user) {
            return false;
        }
        self.users.push(user.to_string());
        true
    }

    /// Remove a user. Returns `false` if the user was not present.
    pub fn remove(&mut self, user: &str) -> bool {
        match self.users.iter().position(|u| u == user) {
            Some(index) => {
                self.users.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if a user is present.
    pub fn contains(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterate over users.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }
}

/// In-memory presentation: a text log and a roster.
///
/// Useful on its own for headless clients and tests, and as the state behind
/// richer front ends.
#[derive(Debug, Clone, Default)]
pub struct BufferedView {
    log: String,
    roster: Roster,
    scrolls: usize,
}

impl BufferedView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full chat log.
    pub fn log(&self) -> &str {
        &self.log
    }

    /// The log split into lines.
    pub fn log_lines(&self) -> Vec<&str> {
        self.log.lines().collect()
    }

    /// The roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// How many times the log was scrolled to the bottom.
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }
}

impl Presentation for BufferedView {
    fn append_log_line(&mut self, text: &str) {
        self.log.push_str(text);
    }

    fn add_roster_entry(&mut self, user: &str) {
        self.roster.insert(user);
    }

    fn remove_roster_entry(&mut self, user: &str) {
        self.roster.remove(user);
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }
}
