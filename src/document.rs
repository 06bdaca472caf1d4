//! Line-level document model used for loading and saving.
//!
//! A [`ConfigDocument`] is the raw line buffer of a configuration file. It is
//! read fresh from disk on every load and save and never cached.
//!
//! Saving merges a [`Store`] into the buffer instead of regenerating the file:
//! - Lines whose key is still in the store get only their value token
//!   replaced, so spacing, quoting and trailing comments survive.
//! - Lines whose key is not in the store are kept verbatim. A partial store
//!   never deletes file content.
//! - Keys missing from the file are inserted after the last entry of their
//!   section, or appended under a new `[section]` header.

use crate::error::{ConfigError, ParseResult};
use crate::escaping::{escape_key, escape_section, escape_value, quote_value};
use crate::keys::{key_field, key_section};
use crate::parser::{LineScanner, ScannedLine};
use crate::store::Store;
use crate::syntax::{
    COMMENT_BLOCK_END, KEY_VALUE_SEPARATOR, SECTION_BLOCK_BEGIN, SECTION_BLOCK_END,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Raw lines of a configuration file
///
/// Lines keep a trailing `\r` if the file had one, so CRLF files are written
/// back unchanged. Lines added by a merge follow the first line's ending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    lines: Vec<String>,
    crlf: bool,
}

impl ConfigDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Split text into a document
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if text.is_empty() || text.ends_with('\n') {
            lines.pop();
        }
        let crlf = lines.first().is_some_and(|line| line.ends_with('\r'));
        Self { lines, crlf }
    }

    /// Read a file into a document; a missing file reads as empty
    pub fn read(path: impl AsRef<Path>) -> ParseResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::from_text(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file missing, using empty buffer");
                Ok(Self::new())
            }
            Err(e) => Err(ConfigError::io(path.display().to_string(), e.to_string())),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Collect the associations of every line. Later duplicates win.
    pub fn to_store(&self) -> Store {
        let mut store = Store::new();
        let mut scanner = LineScanner::new();

        for line in &self.lines {
            if let ScannedLine::Entry { key, value, .. } = scanner.scan(line) {
                store.set(key, value);
            }
        }

        if scanner.is_inside_block() {
            tracing::warn!("Config file ends inside an unterminated comment block");
        }
        store
    }

    /// Merge the associations of `store` into the lines of this document
    pub fn merge(&mut self, store: &Store) {
        let mut pending: BTreeMap<&str, &str> = store.iter().collect();
        let mut scanner = LineScanner::new();
        // Section name -> index right after its last header or entry line
        let mut insertion_points: HashMap<String, usize> = HashMap::new();
        // First header that can have lines put in front of it
        let mut first_header: Option<usize> = None;
        let mut seen_header = false;
        let mut patched = 0usize;

        for (index, line) in self.lines.iter_mut().enumerate() {
            let starts_in_block = scanner.is_inside_block();
            match scanner.scan(line) {
                ScannedLine::Section(name) => {
                    if !seen_header && !starts_in_block {
                        first_header = Some(index);
                    }
                    seen_header = true;
                    insertion_points.insert(name, index + 1);
                }
                ScannedLine::Entry {
                    key,
                    value,
                    value_span,
                    quote,
                } => {
                    if let Some(current) = store.get(&key) {
                        if current != value {
                            let replacement = match quote {
                                Some(q) => quote_value(current, q),
                                None => escape_value(current),
                            };
                            line.replace_range(value_span, &replacement);
                            patched += 1;
                        }
                        pending.remove(key.as_str());
                    }
                    insertion_points.insert(scanner.current_section().to_string(), index + 1);
                }
                ScannedLine::Ignored => {}
            }
        }

        if scanner.is_inside_block() {
            // Anything appended below would otherwise land inside the comment
            let close = self.terminate(COMMENT_BLOCK_END.to_string());
            self.lines.push(close);
        }

        let end = self.lines.len();
        let mut inserts: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut appended = Vec::new();
        let mut sections: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (key, value) in &pending {
            sections
                .entry(key_section(key))
                .or_default()
                .push(self.terminate(format_entry(key_field(key), value)));
        }

        for (section, entries) in sections {
            let point = insertion_points.get(section).copied().or_else(|| {
                // Default-section keys must come before the first header. If
                // that header follows a comment block they go under `[]`.
                match (section.is_empty(), first_header) {
                    (true, Some(index)) => Some(index),
                    (true, None) if !seen_header => Some(end),
                    _ => None,
                }
            });
            match point {
                Some(index) => inserts.entry(index).or_default().extend(entries),
                None => {
                    appended.push(self.terminate(format_section(section)));
                    appended.extend(entries);
                }
            }
        }

        for (index, entries) in inserts.into_iter().rev() {
            self.lines.splice(index..index, entries);
        }
        self.lines.extend(appended);

        tracing::debug!(
            patched,
            added = pending.len(),
            lines = self.lines.len(),
            "Merged store into document"
        );
    }

    /// Write the document to `path`, replacing the file in one step.
    ///
    /// The text goes to a temporary file next to the target which is then
    /// renamed over it, so a failed write leaves the old file intact.
    pub fn write(&self, path: impl AsRef<Path>) -> ParseResult<()> {
        let path = path.as_ref();
        let unavailable = |e: std::io::Error| {
            ConfigError::file_unavailable(path.display().to_string(), e.to_string())
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(unavailable)?;
        temp.write_all(self.to_string().as_bytes())
            .map_err(unavailable)?;
        temp.as_file().sync_all().map_err(unavailable)?;

        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(temp.path(), metadata.permissions()).map_err(unavailable)?;
        }

        temp.persist(path).map_err(|e| unavailable(e.error))?;
        tracing::debug!(path = %path.display(), lines = self.lines.len(), "Wrote config file");
        Ok(())
    }

    /// Render a store from scratch, ignoring any file.
    ///
    /// Default-section keys come first, then each section under its header.
    pub fn synthesize(store: &Store) -> Self {
        let mut lines = Vec::with_capacity(store.len());
        for (section, entries) in store.by_section() {
            if !section.is_empty() {
                lines.push(format_section(section));
            }
            lines.extend(
                entries
                    .into_iter()
                    .map(|(key, value)| format_entry(key_field(key), value)),
            );
        }
        Self { lines, crlf: false }
    }

    fn terminate(&self, line: String) -> String {
        if self.crlf { line + "\r" } else { line }
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn format_entry(field: &str, value: &str) -> String {
    format!(
        "{}{}{}",
        escape_key(field),
        KEY_VALUE_SEPARATOR,
        escape_value(value)
    )
}

fn format_section(section: &str) -> String {
    format!(
        "{}{}{}",
        SECTION_BLOCK_BEGIN,
        escape_section(section),
        SECTION_BLOCK_END
    )
}
