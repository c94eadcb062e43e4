//! Command history for the console
//!
//! Provides in-memory history storage, up/down browsing and lookups used
//! for suggestions. History lives only as long as the console.

use tracing::debug;

/// Browse direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards older entries
    Up,
    /// Towards newer entries
    Down,
}

/// Position of the browse cursor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowseCursor {
    /// Above the oldest entry; shows a blank line
    BeforeOldest,
    /// On a stored entry
    Entry(usize),
    /// Below the newest entry; the fresh input line
    Fresh,
}

/// Command history storage
#[derive(Debug)]
pub struct CommandHistory {
    /// All history entries (newest last)
    entries: Vec<String>,
    /// Browse position
    cursor: BrowseCursor,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: BrowseCursor::BeforeOldest,
        }
    }

    /// Record a submitted line. Empty lines are not stored.
    ///
    /// Returns `true` if the line was added. Adding an entry moves the
    /// browse cursor to the fresh line.
    pub fn add(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }
        self.entries.push(line.to_string());
        self.cursor = BrowseCursor::Fresh;
        true
    }

    /// Seed the history once from a previous run.
    ///
    /// Does nothing if history already has entries or `previous` is empty.
    pub fn seed<I, T>(&mut self, previous: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        if !self.entries.is_empty() {
            return false;
        }
        self.entries.extend(previous.into_iter().map(Into::into));
        if self.entries.is_empty() {
            return false;
        }
        self.cursor = BrowseCursor::Fresh;
        debug!("Seeded history with {} entries", self.entries.len());
        true
    }

    /// Move the browse cursor and return the entry under it, if any.
    ///
    /// Walking past either end lands on a blank line instead of sticking
    /// to the oldest or newest entry.
    pub fn browse(&mut self, direction: Direction) -> Option<&str> {
        let len = self.entries.len();
        self.cursor = match (direction, self.cursor) {
            (Direction::Up, BrowseCursor::Fresh) if len > 0 => BrowseCursor::Entry(len - 1),
            (Direction::Up, BrowseCursor::Entry(i)) if i > 0 => BrowseCursor::Entry(i - 1),
            (Direction::Up, _) => BrowseCursor::BeforeOldest,
            (Direction::Down, BrowseCursor::BeforeOldest) if len > 0 => BrowseCursor::Entry(0),
            (Direction::Down, BrowseCursor::Entry(i)) if i + 1 < len => BrowseCursor::Entry(i + 1),
            (Direction::Down, _) => BrowseCursor::Fresh,
        };
        self.current()
    }

    /// Entry under the browse cursor
    pub fn current(&self) -> Option<&str> {
        match self.cursor {
            BrowseCursor::Entry(i) => self.entries.get(i).map(String::as_str),
            _ => None,
        }
    }

    /// Current browse position
    pub fn cursor(&self) -> BrowseCursor {
        self.cursor
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = BrowseCursor::BeforeOldest;
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Get recent history (newest first)
    pub fn recent(&self, count: usize) -> Vec<&str> {
        self.entries
            .iter()
            .rev()
            .take(count)
            .map(String::as_str)
            .collect()
    }

    /// Newest entry that extends `prefix`
    pub fn complete(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .rev()
            .find(|e| e.len() > prefix.len() && e.starts_with(prefix))
            .map(String::as_str)
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if has any history
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
