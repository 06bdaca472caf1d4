//! # tinyconf
//!
//! A small key/value configuration store backed by a flat `key=value` text
//! file, with optional `[section]` grouping, comments and typed accessors.
//!
//! The interesting part is saving: instead of regenerating the file,
//! [`Config::save`] merges the in-memory values back into the original
//! text. Untouched lines, comments and ordering are preserved; changed keys
//! get only their value replaced; new keys are slotted into their section or
//! appended.
//!
//! ## File format
//!
//! ```text
//! [Net]
//! port=8080
//! host="example.org"            ; quoted values may contain = # ;
//! # line comment
//! /* block
//!    comment */
//! a\=b=c                        # escaped separator: key "a=b"
//! ```
//!
//! Keys inside a section are addressed as `section:field`.
//!
//! ## Example
//!
//! ```rust
//! use tinyconf::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::tempdir()?;
//! # let path = dir.path().join("app.cfg");
//! # std::fs::write(&path, "[Net]\nport=8080 # http\n")?;
//! let mut config = Config::open(&path)?;
//! assert_eq!(config.get::<u16>("Net:port")?, Some(8080));
//!
//! config.set("Net:host", "example.org");
//! config.set_container("Net:retries", &[1, 2, 4]);
//! config.save()?;
//!
//! let text = std::fs::read_to_string(&path)?;
//! assert!(text.starts_with("[Net]\nport=8080 # http\nhost=example.org\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Conversions
//!
//! Values are stored as text. [`ConfigValue`] writes a value and
//! [`FromConfigValue`] reads it back; text that does not convert is reported
//! as [`ConfigError::TypeError`].
//!
//! ## Threading
//!
//! Everything is synchronous and single-threaded. A [`Config`] has no
//! internal locking; wrap it in your own lock to share it.

// Module declarations
mod comments;
mod config;
mod document;
mod error;
mod escaping;
mod keys;
mod parser;
mod store;
mod syntax;
mod types;

// Public API exports
pub use config::Config;
pub use error::{ConfigError, ParseResult};
pub use store::Store;
pub use types::{ConfigValue, FromConfigValue};

// Re-export submodules for advanced usage
pub use comments::{CommentFilter, FilteredLine};
pub use document::ConfigDocument;
pub use escaping::{
    escape_key, escape_section, escape_value, unescape_key, unescape_value,
};
pub use keys::{key_field, key_section, qualify, split_key};
pub use parser::{LineParser, LineScanner, ParsedLine, ScannedLine};
pub use syntax::*;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
