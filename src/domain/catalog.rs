//! The clause catalog is the reference table that maps each clause of the
//! regulatory order to the specialists and tests it requires.
//!
//! A [`ClauseCatalog`] is built once and never mutated afterwards. Engines hold
//! it behind an `Arc`, so any number of computations may read it at the same
//! time.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{ClauseEntry, ClauseId, OrderedSet};

/// Errors that can occur when building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two entries share the same identifier.
    #[error("clause '{0}' is defined more than once")]
    DuplicateClause(ClauseId),
}

/// An immutable, ordered table of clauses keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseCatalog {
    entries: Vec<ClauseEntry>,
    index: HashMap<ClauseId, usize>,
}

impl ClauseCatalog {
    /// Builds a catalog from entries, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateClause`] if two entries share an
    /// identifier.
    pub fn new(entries: impl IntoIterator<Item = ClauseEntry>) -> Result<Self, CatalogError> {
        let entries: Vec<ClauseEntry> = entries.into_iter().collect();
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id().clone(), position).is_some() {
                return Err(CatalogError::DuplicateClause(entry.id().clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Looks up a clause by its exact label.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&ClauseEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Whether a clause with this label exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates the clauses in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, ClauseEntry> {
        self.entries.iter()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splits `ids` into the labels present in the catalog and those that
    /// are not, keeping the order of each.
    #[must_use]
    pub fn partition_known<'a>(
        &self,
        ids: &'a [ClauseId],
    ) -> (Vec<&'a ClauseId>, Vec<&'a ClauseId>) {
        ids.iter().partition(|id| self.contains(id.as_str()))
    }
}

impl<'a> IntoIterator for &'a ClauseCatalog {
    type Item = &'a ClauseEntry;
    type IntoIter = std::slice::Iter<'a, ClauseEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolves the doctors associated with a selection of clauses.
///
/// This is the contract a persisted person-record store offers: given the
/// clause texts currently selected, return the distinct doctor names linked to
/// any of them. Clause texts match exactly and case-sensitively; unknown
/// clauses contribute nothing. Names come back in first-seen order.
pub trait DoctorLookup {
    /// Returns the distinct doctors associated with any of `clauses`.
    fn doctors_for(&self, clauses: &[ClauseId]) -> Vec<String>;
}

impl DoctorLookup for ClauseCatalog {
    fn doctors_for(&self, clauses: &[ClauseId]) -> Vec<String> {
        clauses
            .iter()
            .filter_map(|id| self.lookup(id.as_str()))
            .flat_map(|entry| entry.doctors().iter().cloned())
            .collect::<OrderedSet<_>>()
            .into_vec()
    }
}
