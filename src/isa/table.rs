//! Declaration-ordered identifier tables.

use std::fmt;

use ahash::AHashMap;
use serde::{Serialize, Serializer};

/// Entries that are addressed by a string identifier.
pub trait Named {
    fn name(&self) -> &str;
}

/// An identifier-keyed table that iterates in insertion order.
///
/// Lookups go through a hash index; iteration, serialization and equality only ever see
/// the declaration-ordered entry list.
#[derive(Clone)]
pub struct Table<T> {
    entries: Vec<T>,
    index: AHashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<T: Named> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. An entry with the same name is replaced in place and returned.
    pub fn insert(&mut self, entry: T) -> Option<T> {
        if let Some(&slot) = self.index.get(entry.name()) {
            return Some(std::mem::replace(&mut self.entries[slot], entry));
        }
        self.index
            .insert(entry.name().to_string(), self.entries.len());
        self.entries.push(entry);
        None
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Named> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = Table::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: PartialEq> PartialEq for Table<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: fmt::Debug> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<T: Serialize> Serialize for Table<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Entry(&'static str, u32);

    impl Named for Entry {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn iterates_in_insertion_order() {
        let table: Table<Entry> = [Entry("zeta", 1), Entry("alpha", 2), Entry("mid", 3)]
            .into_iter()
            .collect();
        let names: Vec<_> = table.iter().map(|entry| entry.0).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.get("alpha"), Some(&Entry("alpha", 2)));
        assert!(!table.contains("beta"));
    }

    #[test]
    fn replacing_keeps_original_slot() {
        let mut table = Table::new();
        table.insert(Entry("a", 1));
        table.insert(Entry("b", 2));
        let previous = table.insert(Entry("a", 3));
        assert_eq!(previous, Some(Entry("a", 1)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0], Entry("a", 3));
    }
}
