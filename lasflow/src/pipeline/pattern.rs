//! File-name patterns inside the shared temp namespace.

use serde::Serialize;
use std::fmt;

/// A single-wildcard file-name pattern, `prefix*suffix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FilePattern {
    prefix: &'static str,
    suffix: &'static str,
}

impl FilePattern {
    /// Creates a pattern matching names that start with `prefix` and end with `suffix`.
    #[must_use]
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// The fixed prefix.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// The fixed suffix.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    /// Returns true if the file name matches.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() >= self.prefix.len() + self.suffix.len()
            && file_name.starts_with(self.prefix)
            && file_name.ends_with(self.suffix)
    }

    /// Returns true if every name matched by `other` is also matched by `self`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        other.prefix.starts_with(self.prefix) && other.suffix.ends_with(self.suffix)
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.prefix, self.suffix)
    }
}
