use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllowListError {
    #[error("allow-list must name at least one user")]
    Empty,
    #[error("allow-list contains a blank username")]
    BlankEntry,
}

/// The fixed set of usernames admitted to the chat.
///
/// Entries are normalized (trimmed, lowercased) once at construction. Lookups are exact
/// matches against the normalized entries; request input is never normalized here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    /// Builds an allow-list from configured names.
    ///
    /// # Errors
    /// Returns `AllowListError::Empty` if no names are given and
    /// `AllowListError::BlankEntry` if any name is blank.
    pub fn new<I, S>(names: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let normalized = name.as_ref().trim().to_lowercase();
            if normalized.is_empty() {
                return Err(AllowListError::BlankEntry);
            }
            set.insert(normalized);
        }

        if set.is_empty() {
            return Err(AllowListError::Empty);
        }

        Ok(Self { names: set })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        match names.as_slice() {
            [] => Ok(()),
            [only] => f.write_str(only),
            [init @ .., last] => write!(f, "{} and {}", init.join(", "), last),
        }
    }
}
