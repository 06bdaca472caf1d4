//! Syntax characters of the configuration file format.
//!
//! Changing any of these keeps the parser working but makes previously
//! written files unreadable. Markers that are matched by the pest grammar
//! (`keyvalue.pest`) must be changed there as well.

/// Escapes the character that follows it.
pub const ESCAPE_CHARACTER: char = '\\';

/// Characters starting a comment that runs to the end of the line.
pub const COMMENT_LINE_SEPARATORS: [char; 2] = [';', '#'];

/// Opens a comment block, which may span several lines.
pub const COMMENT_BLOCK_BEGIN: &str = "/*";

/// Closes a comment block.
pub const COMMENT_BLOCK_END: &str = "*/";

/// Separates the section from the field in a qualified key (`section:field`).
pub const SECTION_FIELD_SEPARATOR: char = ':';

/// Opens a section header.
pub const SECTION_BLOCK_BEGIN: char = '[';

/// Closes a section header.
pub const SECTION_BLOCK_END: char = ']';

/// Characters that may brace a key or a value.
pub const STRING_IDENTIFIERS: [char; 2] = ['"', '\''];

/// Sits between the key and the value on a line.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Separates the elements of pairs and containers inside a value.
pub const VALUE_FIELD_SEPARATOR: char = ':';

pub(crate) fn is_string_identifier(b: u8) -> bool {
    STRING_IDENTIFIERS.iter().any(|&c| c as u8 == b)
}

pub(crate) fn is_line_comment(b: u8) -> bool {
    COMMENT_LINE_SEPARATORS.iter().any(|&c| c as u8 == b)
}
