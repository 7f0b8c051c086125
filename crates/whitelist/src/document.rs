//! Whitelist document parsing and case-insensitive deduplication

use std::collections::HashSet;

/// Uniqueness key for an entry
pub fn entry_key(name: &str) -> String {
    name.to_lowercase()
}

/// Ordered, deduplicated view of the whitelist document
///
/// Entries keep the casing they were first seen with; later entries whose
/// lowercase form is already present are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistDocument {
    entries: Vec<String>,
    keys: HashSet<String>,
}

impl WhitelistDocument {
    /// Parse raw document text
    ///
    /// Lines are trimmed (which strips carriage returns), blank lines are
    /// dropped, and the first occurrence of each key wins.
    pub fn parse(content: &str) -> Self {
        let mut document = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if !line.is_empty() {
                document.insert(line);
            }
        }
        document
    }

    /// Append `name` unless its key is already present; returns whether it was added
    pub fn insert(&mut self, name: &str) -> bool {
        if self.keys.insert(entry_key(name)) {
            self.entries.push(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&entry_key(name))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back to newline-joined text
    pub fn to_content(&self) -> String {
        self.entries.join("\n")
    }
}
