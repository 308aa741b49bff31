use std::{collections::HashSet, hash::Hash};

/// A sequence that refuses duplicates.
///
/// The first insertion of a value fixes its position; later insertions of an
/// equal value are ignored. The backing `Vec` and `HashSet` are always
/// updated together.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> OrderedSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Appends `value` unless an equal value is already present.
    ///
    /// Returns `true` if the value was appended.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    /// Whether an equal value is present.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.seen.contains(value)
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the values in first-insertion order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone + Eq + Hash> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insertion_keeps_its_position() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert!(set.insert("c"));

        assert_eq!(set.into_vec(), vec!["b", "a", "c"]);
    }

    #[test]
    fn extend_skips_duplicates_across_batches() {
        let mut set: OrderedSet<String> = ["x", "y"].into_iter().map(String::from).collect();
        set.extend(["y", "z", "x", "w"].into_iter().map(String::from));

        assert_eq!(set.len(), 4);
        assert!(set.contains("z"));
        assert!(!set.contains("v"));
        let items: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(items, ["x", "y", "z", "w"]);
    }

    #[test]
    fn empty_set() {
        let set: OrderedSet<u8> = OrderedSet::with_capacity(4);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
