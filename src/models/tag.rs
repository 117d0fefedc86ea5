//! Canonical clan and player tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical clan/player identifier: uppercase ASCII alphanumerics, no `#`.
///
/// Two tags refer to the same entity iff their canonical forms are equal, so
/// every join between roster, battle log and war log goes through [`Tag::normalize`].
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(String);

impl Tag {
    /// Normalize any raw tag input (with or without `#`, URL-encoded or not).
    ///
    /// Never fails: garbage degrades to an empty or partial tag.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        let decoded = urlencoding::decode(trimmed)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| trimmed.to_string());

        let canonical = decoded
            .replacen('#', "", 1)
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .collect();

        Self(canonical)
    }

    /// Get the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Percent-encoded `#TAG`, as the upstream expects in URL paths.
    pub fn to_path_segment(&self) -> String {
        urlencoding::encode(&format!("#{}", self.0)).into_owned()
    }
}

/// Shorthand for [`Tag::normalize`].
pub fn normalize_tag(raw: &str) -> Tag {
    Tag::normalize(raw)
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}
