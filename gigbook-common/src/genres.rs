//! Genre tag sets
//!
//! Genres attached to a venue or artist are an unordered set: tags are
//! trimmed, blanks are dropped and duplicates collapse. Iteration and
//! serialization are in sorted order so output is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unordered, deduplicated set of genre tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GenreSet(BTreeSet<String>);

impl GenreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns false if it was blank or already present
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.0.insert(tag.to_string())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag.trim())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for GenreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = GenreSet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for GenreSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<GenreSet> for Vec<String> {
    fn from(set: GenreSet) -> Self {
        set.0.into_iter().collect()
    }
}
