//! Member model.
//!
//! Members are the people placed on duty. A member flagged `special` is
//! guaranteed one seat in every room/slot pair (reused round-robin); all
//! other members are consumed at most once per roster.

use serde::{Deserialize, Serialize};

/// A person that can be assigned to a room during a timing slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier (e.g. staff number).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Guaranteed, cyclically rotated placement.
    #[serde(default)]
    pub special: bool,
}

impl Member {
    /// Creates a general (non-special) member.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            special: false,
        }
    }

    /// Creates a special member.
    pub fn special(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name).with_special(true)
    }

    /// Sets the special flag.
    pub fn with_special(mut self, special: bool) -> Self {
        self.special = special;
        self
    }

    /// Whether this is a general member.
    #[inline]
    pub fn is_general(&self) -> bool {
        !self.special
    }
}

/// Normalizes a person name to Title Case, collapsing runs of spaces.
///
/// `"  jOHN   doe "` becomes `"John Doe"`.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
