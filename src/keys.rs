//! Qualified keys: `section:field`
//!
//! The section of a key is everything before the first unescaped
//! [`SECTION_FIELD_SEPARATOR`]. Keys without one live in the default
//! section, which is the empty string.

use crate::escaping::find_unescaped;
use crate::syntax::SECTION_FIELD_SEPARATOR;

/// Split a key into its section and field
pub fn split_key(key: &str) -> (&str, &str) {
    match find_unescaped(key, SECTION_FIELD_SEPARATOR) {
        Some(pos) => (&key[..pos], &key[pos + SECTION_FIELD_SEPARATOR.len_utf8()..]),
        None => ("", key),
    }
}

/// Section part of a key, empty for the default section
pub fn key_section(key: &str) -> &str {
    split_key(key).0
}

/// Field part of a key
pub fn key_field(key: &str) -> &str {
    split_key(key).1
}

/// Build the key a field gets inside a section
pub fn qualify(section: &str, field: &str) -> String {
    if section.is_empty() {
        field.to_string()
    } else {
        format!("{}{}{}", section, SECTION_FIELD_SEPARATOR, field)
    }
}
