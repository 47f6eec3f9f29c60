//! Substring search over a [`LineStore`].
//!
//! One search is active per store. Matching is a plain byte-substring test
//! per line, first occurrence wins; patterns never span lines.

use crate::editor::{Line, LineStore};

/// A match position: zero-based line index and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub column: usize,
}

/// State of the active search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pattern: Vec<u8>,
    anchor_line: usize,
    last_match: Option<Match>,
    found: bool,
}

impl SearchState {
    pub fn new(pattern: &str, from_line: usize) -> Self {
        Self {
            pattern: pattern.as_bytes().to_vec(),
            anchor_line: from_line,
            last_match: None,
            found: false,
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// The pattern, decoded for messages.
    pub fn pattern_display(&self) -> String {
        String::from_utf8_lossy(&self.pattern).to_string()
    }

    pub const fn anchor_line(&self) -> usize {
        self.anchor_line
    }

    pub const fn last_match(&self) -> Option<Match> {
        self.last_match
    }

    pub const fn found(&self) -> bool {
        self.found
    }

    /// Scan forward from the anchor line, inclusive.
    pub fn advance(&mut self, store: &LineStore) -> Option<Match> {
        let found = store
            .iter()
            .enumerate()
            .skip(self.anchor_line)
            .find_map(|(index, (_, line))| self.match_in(index, line));
        self.record(found)
    }

    /// Scan forward from the line after the last match.
    pub fn next(&mut self, store: &LineStore) -> Option<Match> {
        if let Some(last) = self.last_match {
            self.anchor_line = last.line + 1;
        }
        self.advance(store)
    }

    /// Scan backward from the line before the last match toward the head.
    pub fn previous(&mut self, store: &LineStore) -> Option<Match> {
        let before = self.last_match.map_or(self.anchor_line, |m| m.line);
        let mut found = None;
        if let Some(mut index) = before.checked_sub(1) {
            let mut cursor = store.nth(index);
            while let Some(id) = cursor {
                found = store.line(id).and_then(|line| self.match_in(index, line));
                if found.is_some() || index == 0 {
                    break;
                }
                index -= 1;
                cursor = store.prev(id);
            }
        }
        if let Some(m) = found {
            self.anchor_line = m.line;
        }
        self.record(found)
    }

    fn match_in(&self, index: usize, line: &Line) -> Option<Match> {
        find_bytes(line.content(), &self.pattern).map(|column| Match {
            line: index,
            column,
        })
    }

    fn record(&mut self, found: Option<Match>) -> Option<Match> {
        self.found = found.is_some();
        if found.is_some() {
            self.last_match = found;
        }
        tracing::debug!(
            pattern = %self.pattern_display(),
            found = ?found,
            "search"
        );
        found
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
