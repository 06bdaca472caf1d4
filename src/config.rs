use crate::document::ConfigDocument;
use crate::error::{ConfigError, ParseResult};
use crate::store::Store;
use crate::syntax::VALUE_FIELD_SEPARATOR;
use crate::types::{ConfigValue, FromConfigValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration manager
///
/// Holds the associations of one configuration file in memory. The file is
/// read when the configuration is opened, reloaded or relocated, and written
/// back by [`Config::save`]. No file handle stays open in between.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Configuration values: section:field -> text
    store: Store,

    /// Backing file, if bound
    path: Option<PathBuf>,
}

impl Config {
    /// Create an empty configuration that is not bound to a file
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a file and load it. A missing file gives an empty configuration.
    pub fn open(path: impl AsRef<Path>) -> ParseResult<Self> {
        let mut config = Self {
            store: Store::new(),
            path: Some(path.as_ref().to_path_buf()),
        };
        config.load()?;
        Ok(config)
    }

    /// Path of the bound file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bind to another file without touching the values in memory
    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        self.path = Some(path.as_ref().to_path_buf());
    }

    fn bound_path(&self) -> ParseResult<&Path> {
        self.path.as_deref().ok_or(ConfigError::NoFileBound)
    }

    /// Read the bound file into memory, overwriting keys it defines
    pub fn load(&mut self) -> ParseResult<()> {
        let path = self.bound_path()?.to_path_buf();
        let loaded = ConfigDocument::read(&path)?.to_store();
        tracing::debug!(path = %path.display(), keys = loaded.len(), "Loaded config");
        self.store.append(&loaded);
        Ok(())
    }

    /// Drop everything in memory and read the bound file again
    pub fn reload(&mut self) -> ParseResult<()> {
        let path = self.bound_path()?.to_path_buf();
        self.relocate(path)
    }

    /// Bind to another file, dropping everything in memory, and load it
    pub fn relocate(&mut self, path: impl AsRef<Path>) -> ParseResult<()> {
        self.set_path(path);
        self.clear();
        self.load()
    }

    /// Check if the configuration holds no keys
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of keys in memory
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Empty the configuration in memory; the file is untouched
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Delete the bound file from disk
    pub fn destroy(&self) -> ParseResult<bool> {
        Ok(Self::destroy_file(self.bound_path()?))
    }

    /// Delete a configuration file from disk, returning whether it worked
    pub fn destroy_file(path: impl AsRef<Path>) -> bool {
        match fs::remove_file(path.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(path = %path.as_ref().display(), error = %e, "Could not delete config file");
                false
            }
        }
    }

    // ========== GETTERS ==========

    /// Check if a key exists
    pub fn exists(&self, key: &str) -> bool {
        self.store.exists(key)
    }

    /// Check if a key holds the canonical text of `value`
    pub fn compare<T: ConfigValue>(&self, key: &str, value: T) -> bool {
        self.store.get(key) == Some(value.to_config_string().as_str())
    }

    /// Get the raw text of a key
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.store.get(key)
    }

    /// Get a typed value.
    ///
    /// Returns `Ok(None)` if the key is absent and a type error if its text
    /// does not convert to `T`.
    pub fn get<T: FromConfigValue>(&self, key: &str) -> ParseResult<Option<T>> {
        self.store
            .get(key)
            .map(|text| T::from_config_str(text).map_err(|e| e.for_key(key)))
            .transpose()
    }

    /// Get a string value
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.store.get(key).map(str::to_string)
    }

    /// Get a pair stored as `first:second`
    pub fn get_pair<A, B>(&self, key: &str) -> ParseResult<Option<(A, B)>>
    where
        A: FromConfigValue,
        B: FromConfigValue,
    {
        let Some(text) = self.store.get(key) else {
            return Ok(None);
        };
        let (first, second) = text
            .split_once(VALUE_FIELD_SEPARATOR)
            .ok_or_else(|| ConfigError::type_error(key, "pair", text))?;

        let first = A::from_config_str(first).map_err(|e| e.for_key(key))?;
        let second = B::from_config_str(second).map_err(|e| e.for_key(key))?;
        Ok(Some((first, second)))
    }

    /// Get a container stored as `a:b:c`.
    ///
    /// Builds a fresh container in stored order; an empty value gives an
    /// empty container.
    ///
    /// ```rust
    /// use tinyconf::Config;
    ///
    /// let mut config = Config::new();
    /// config.set_container("V", &[1, 2, 3]);
    /// let v: Vec<i32> = config.get_container("V").unwrap().unwrap();
    /// assert_eq!(v, vec![1, 2, 3]);
    /// ```
    pub fn get_container<C>(&self, key: &str) -> ParseResult<Option<C>>
    where
        C: IntoIterator + FromIterator<<C as IntoIterator>::Item>,
        C::Item: FromConfigValue,
    {
        let Some(text) = self.store.get(key) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(Some(std::iter::empty::<C::Item>().collect()));
        }

        text.split(VALUE_FIELD_SEPARATOR)
            .map(|token| {
                <C::Item as FromConfigValue>::from_config_str(token).map_err(|e| e.for_key(key))
            })
            .collect::<ParseResult<C>>()
            .map(Some)
    }

    // ========== SETTERS ==========

    /// Set a value, replacing any previous one
    pub fn set<T: ConfigValue>(&mut self, key: impl Into<String>, value: T) {
        self.store.set(key, value.to_config_string());
    }

    /// Set a pair as `first:second`
    pub fn set_pair<A, B>(&mut self, key: impl Into<String>, pair: &(A, B))
    where
        A: ConfigValue,
        B: ConfigValue,
    {
        let text = format!(
            "{}{}{}",
            pair.0.to_config_string(),
            VALUE_FIELD_SEPARATOR,
            pair.1.to_config_string()
        );
        self.store.set(key, text);
    }

    /// Set the elements of any iterable as `a:b:c`
    pub fn set_container<I>(&mut self, key: impl Into<String>, items: I)
    where
        I: IntoIterator,
        I::Item: ConfigValue,
    {
        let text = items
            .into_iter()
            .map(|item| item.to_config_string())
            .collect::<Vec<_>>()
            .join(&VALUE_FIELD_SEPARATOR.to_string());
        self.store.set(key, text);
    }

    // ========== MODIFIERS ==========

    /// Duplicate the value of `src` under `dest`
    pub fn copy(&mut self, src: &str, dest: &str) -> ParseResult<()> {
        self.store.copy(src, dest)
    }

    /// Rename `src` to `dest`
    pub fn move_key(&mut self, src: &str, dest: &str) -> ParseResult<()> {
        self.store.move_key(src, dest)
    }

    /// Remove a key
    pub fn erase(&mut self, key: &str) -> ParseResult<()> {
        self.store.erase(key).map(|_| ())
    }

    // ========== LOAD / SAVE ==========

    /// Write the configuration into the bound file.
    ///
    /// Lines of keys still in memory get their value updated in place; every
    /// other line is kept as is, and keys the file lacks are added. Keys
    /// erased from memory are therefore not removed from the file.
    pub fn save(&self) -> ParseResult<()> {
        let path = self.bound_path()?.to_path_buf();
        self.save_as(path)
    }

    /// Merge the configuration into another file without rebinding
    pub fn save_as(&self, path: impl AsRef<Path>) -> ParseResult<()> {
        let path = path.as_ref();
        let mut document = ConfigDocument::read(path)?;
        document.merge(&self.store);
        document.write(path)
    }

    /// Render the whole configuration as fresh file text, ignoring any file
    pub fn serialize(&self) -> String {
        ConfigDocument::synthesize(&self.store).to_string()
    }

    // ========== INTEROPERABILITY ==========

    /// Copy a key into another configuration
    pub fn copy_to(&self, key: &str, target: &mut Config) -> ParseResult<()> {
        let value = self
            .store
            .get(key)
            .ok_or_else(|| ConfigError::key_not_found(key))?;
        target.store.set(key, value);
        Ok(())
    }

    /// Move a key into another configuration.
    ///
    /// Returns false and changes nothing if the key does not exist.
    pub fn move_to(&mut self, key: &str, target: &mut Config) -> bool {
        match self.store.erase(key) {
            Ok(value) => {
                target.store.set(key, value);
                true
            }
            Err(_) => false,
        }
    }

    /// Copy every key of `source` into this configuration, overwriting collisions
    pub fn append(&mut self, source: &Config) {
        self.store.append(&source.store);
    }

    /// Copy every key of a configuration file into this configuration
    pub fn append_file(&mut self, path: impl AsRef<Path>) -> ParseResult<()> {
        let source = Config::open(path)?;
        self.append(&source);
        Ok(())
    }

    /// The associations held in memory
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Iterate associations in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.store.iter()
    }

    /// All keys in order
    pub fn keys(&self) -> Vec<&str> {
        self.store.keys().collect()
    }
}

impl From<Store> for Config {
    fn from(store: Store) -> Self {
        Self { store, path: None }
    }
}
