//! Regular expressions compiled on first use

use crate::{PackError, PackResult};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A regular expression kept in source form until it is first matched.
///
/// Construction never fails; a malformed pattern is reported by the first
/// call to [`LazyRegex::is_match`].
#[derive(Debug, Clone)]
pub struct LazyRegex {
    source: String,
    compiled: OnceCell<Regex>,
}

impl LazyRegex {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match `haystack`, compiling the pattern if needed.
    ///
    /// A failed compile is not cached, so every call reports the error.
    pub fn is_match(&self, haystack: &str) -> PackResult<bool> {
        let regex = self.compiled.get_or_try_init(|| match Regex::new(&self.source) {
            Ok(regex) => {
                tracing::debug!(pattern = %self.source, "Compiled pattern");
                Ok(regex)
            }
            Err(e) => {
                tracing::warn!(pattern = %self.source, error = %e, "Invalid pattern");
                Err(PackError::InvalidPattern {
                    pattern: self.source.clone(),
                    reason: e.to_string(),
                })
            }
        })?;
        Ok(regex.is_match(haystack))
    }

    /// Whether a previous match already compiled the pattern
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }
}

impl PartialEq for LazyRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for LazyRegex {}

impl std::fmt::Display for LazyRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

impl Serialize for LazyRegex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for LazyRegex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}
