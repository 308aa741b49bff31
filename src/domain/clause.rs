use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// A human-readable label identifying a clause of the regulatory order.
///
/// Labels are compared exactly (case-sensitive). Surrounding whitespace is
/// trimmed on construction, and a label must contain at least one
/// non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClauseId(NonEmptyString);

impl ClauseId {
    /// Creates a new `ClauseId` from a label.
    ///
    /// # Errors
    ///
    /// Returns `EmptyClauseIdError` if the label is empty or only whitespace.
    pub fn new(label: impl Into<String>) -> Result<Self, EmptyClauseIdError> {
        let label = label.into();
        let trimmed = label.trim();
        let label = if trimmed.len() == label.len() {
            label
        } else {
            trimmed.to_string()
        };
        NonEmptyString::new(label)
            .map(Self)
            .map_err(|_| EmptyClauseIdError)
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Hash for ClauseId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for ClauseId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for ClauseId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for ClauseId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClauseId {
    type Err = EmptyClauseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClauseId {
    type Error = EmptyClauseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClauseId {
    type Error = EmptyClauseIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClauseId> for String {
    fn from(id: ClauseId) -> Self {
        id.as_str().to_string()
    }
}

/// Error returned when a clause label is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("clause identifier must contain at least one non-whitespace character")]
pub struct EmptyClauseIdError;

/// A clause of the regulatory order together with the specialists and tests
/// it requires.
///
/// Doctor and test names keep the order in which they were listed. The same
/// name may appear in several clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseEntry {
    id: ClauseId,
    doctors: Vec<String>,
    tests: Vec<String>,
}

impl ClauseEntry {
    /// Creates a clause entry.
    #[must_use]
    pub const fn new(id: ClauseId, doctors: Vec<String>, tests: Vec<String>) -> Self {
        Self { id, doctors, tests }
    }

    /// The clause identifier.
    #[must_use]
    pub const fn id(&self) -> &ClauseId {
        &self.id
    }

    /// Doctors required by this clause, in listed order.
    #[must_use]
    pub fn doctors(&self) -> &[String] {
        &self.doctors
    }

    /// Tests required by this clause, in listed order.
    #[must_use]
    pub fn tests(&self) -> &[String] {
        &self.tests
    }
}
