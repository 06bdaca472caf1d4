use crate::error::{ConfigError, ParseResult};
use crate::keys::key_section;
use std::collections::BTreeMap;

/// In-memory associations of qualified keys to their text values.
///
/// Keys iterate in sorted order, so sections group together and new keys
/// are written out deterministically. There is at most one value per key;
/// setting an existing key overwrites it.
///
/// A store is plain owned data with no interior locking. Share it between
/// threads only behind your own synchronization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    associations: BTreeMap<String, String>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    /// Drop every association
    pub fn clear(&mut self) {
        self.associations.clear();
    }

    /// Check if a key exists
    pub fn exists(&self, key: &str) -> bool {
        self.associations.contains_key(key)
    }

    /// Get the text stored under a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.associations.get(key).map(String::as_str)
    }

    /// Set the text of a key, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.associations.insert(key.into(), value.into());
    }

    /// Remove a key, returning its value
    pub fn erase(&mut self, key: &str) -> ParseResult<String> {
        self.associations
            .remove(key)
            .ok_or_else(|| ConfigError::key_not_found(key))
    }

    /// Duplicate the value of `src` under `dest`
    pub fn copy(&mut self, src: &str, dest: &str) -> ParseResult<()> {
        let value = self
            .get(src)
            .ok_or_else(|| ConfigError::key_not_found(src))?
            .to_string();
        self.set(dest, value);
        Ok(())
    }

    /// Rename `src` to `dest`; nothing changes if `src` is missing
    pub fn move_key(&mut self, src: &str, dest: &str) -> ParseResult<()> {
        let value = self.erase(src)?;
        self.set(dest, value);
        Ok(())
    }

    /// Copy every association of `other` into this store, overwriting collisions
    pub fn append(&mut self, other: &Store) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Iterate associations in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.associations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.associations.keys().map(String::as_str)
    }

    /// Associations grouped by section, sections and keys in order
    pub fn by_section(&self) -> BTreeMap<&str, Vec<(&str, &str)>> {
        let mut sections: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
        for (key, value) in self.iter() {
            sections.entry(key_section(key)).or_default().push((key, value));
        }
        sections
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Store::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}
