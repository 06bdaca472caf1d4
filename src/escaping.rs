//! Escape handling for keys and values
//!
//! A backslash makes the following character literal: `a\=b=c` has the key
//! `a=b`. The scanning helpers here skip escaped characters, and the
//! escape/unescape pair converts between stored text and its on-disk form.
//!
//! Inside keys the sequence `\:` is never resolved, so a field containing
//! the section separator survives in the qualified key (`a\:b` stays a bare
//! field, not section `a`).

use crate::syntax::{
    ESCAPE_CHARACTER, KEY_VALUE_SEPARATOR, SECTION_BLOCK_END, SECTION_FIELD_SEPARATOR,
    is_line_comment, is_string_identifier,
};

/// Find the first occurrence of `target` that is not escaped
pub fn find_unescaped(input: &str, target: char) -> Option<usize> {
    let mut chars = input.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch == ESCAPE_CHARACTER {
            chars.next();
        } else if ch == target {
            return Some(i);
        }
    }
    None
}

/// Resolve escape sequences, keeping the ones listed in `keep` verbatim
pub fn unescape(input: &str, keep: &[char]) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != ESCAPE_CHARACTER {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some(next) if keep.contains(&next) => {
                result.push(ch);
                result.push(next);
            }
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some(next) => result.push(next),
            // Trailing backslash has nothing to escape
            None => result.push(ch),
        }
    }

    result
}

/// Resolve escapes in a key, leaving `\:` in place
pub fn unescape_key(input: &str) -> String {
    unescape(input, &[SECTION_FIELD_SEPARATOR])
}

/// Resolve every escape in a value
pub fn unescape_value(input: &str) -> String {
    unescape(input, &[])
}

/// Render a field name the way it has to appear on a line
pub fn escape_key(field: &str) -> String {
    format_token(field, Token::Key)
}

/// Render a value the way it has to appear on a line
pub fn escape_value(value: &str) -> String {
    format_token(value, Token::Value)
}

/// Render a section name the way it has to appear between the brackets.
///
/// Headers cannot be quoted, so surrounding whitespace is escaped instead.
pub fn escape_section(name: &str) -> String {
    format_token(name, Token::Section)
}

/// Render a value inside the given quote character
pub fn quote_value(value: &str, quote: char) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push(quote);
    push_quoted_body(&mut result, value, quote, false);
    result.push(quote);
    result
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Key,
    Value,
    Section,
}

fn format_token(text: &str, token: Token) -> String {
    if token == Token::Key && text.is_empty() {
        return "\"\"".to_string();
    }

    let padded = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    if padded && token != Token::Section {
        let mut result = String::with_capacity(text.len() + 2);
        result.push('"');
        push_quoted_body(&mut result, text, '"', token == Token::Key);
        result.push('"');
        return result;
    }

    // Byte range between the leading and trailing whitespace
    let body_start = text.len() - text.trim_start().len();
    let body_end = text.trim_end().len();
    let keeps_separator = token != Token::Value;

    let mut result = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if push_line_break(&mut result, ch) {
            continue;
        }
        let next = chars.peek().map(|&(_, c)| c);
        let needs_escape = if ch == ESCAPE_CHARACTER {
            !(keeps_separator && next == Some(SECTION_FIELD_SEPARATOR))
        } else if ch.is_whitespace() {
            i < body_start || i >= body_end
        } else if ch.is_ascii() {
            let b = ch as u8;
            is_line_comment(b)
                || is_string_identifier(b)
                || (token == Token::Key && ch == KEY_VALUE_SEPARATOR)
                || (token == Token::Section && ch == SECTION_BLOCK_END)
                || (ch == '/' && next == Some('*'))
        } else {
            false
        };
        if needs_escape {
            result.push(ESCAPE_CHARACTER);
        }
        result.push(ch);
    }
    result
}

fn push_quoted_body(result: &mut String, text: &str, quote: char, is_key: bool) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if push_line_break(result, ch) {
            continue;
        }
        let keep_separator = is_key && chars.peek() == Some(&SECTION_FIELD_SEPARATOR);
        if ch == quote || (ch == ESCAPE_CHARACTER && !keep_separator) {
            result.push(ESCAPE_CHARACTER);
        }
        result.push(ch);
    }
}

/// Write `\n` and `\r` as escape sequences so an entry stays on one line
fn push_line_break(result: &mut String, ch: char) -> bool {
    let letter = match ch {
        '\n' => 'n',
        '\r' => 'r',
        _ => return false,
    };
    result.push(ESCAPE_CHARACTER);
    result.push(letter);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_unescaped_skips_escaped() {
        assert_eq!(find_unescaped(r"a\=b=c", '='), Some(4));
        assert_eq!(find_unescaped(r"a\=b", '='), None);
        assert_eq!(find_unescaped("plain", ':'), None);
    }

    #[test]
    fn test_find_unescaped_double_backslash() {
        // The second backslash is itself escaped, so '=' is live
        assert_eq!(find_unescaped(r"a\\=b", '='), Some(3));
    }

    #[test]
    fn test_unescape_key_keeps_section_separator() {
        assert_eq!(unescape_key(r"a\=b"), "a=b");
        assert_eq!(unescape_key(r"a\:b"), r"a\:b");
    }

    #[test]
    fn test_unescape_value() {
        assert_eq!(unescape_value(r"C:\\dir"), r"C:\dir");
        assert_eq!(unescape_value(r"50\% \#1"), "50% #1");
        assert_eq!(unescape_value(r"tail\"), r"tail\");
    }

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("a=b"), r"a\=b");
        assert_eq!(escape_key(r"a\:b"), r"a\:b");
        assert_eq!(escape_key("#tag"), r"\#tag");
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("x=y"), "x=y");
        assert_eq!(escape_value("a # b"), r"a \# b");
        assert_eq!(escape_value("it's"), r"it\'s");
        assert_eq!(escape_value("/* no */"), r"\/* no */");
        assert_eq!(escape_value(" padded "), "\" padded \"");
    }

    #[test]
    fn test_line_breaks_are_escaped() {
        assert_eq!(escape_value("a\nb=c"), r"a\nb=c");
        assert_eq!(escape_value("\r\n"), r#""\r\n""#);
        assert_eq!(quote_value("x\ny", '\''), r"'x\ny'");
        assert_eq!(unescape_value(r"a\nb\rc"), "a\nb\rc");
        assert_eq!(unescape_value(r"C:\\new"), r"C:\new");
    }

    #[test]
    fn test_escape_section() {
        assert_eq!(escape_section("Net"), "Net");
        assert_eq!(escape_section("a#b;c"), r"a\#b\;c");
        assert_eq!(escape_section("x]y"), r"x\]y");
        assert_eq!(escape_section(" pad "), r"\ pad\ ");
        assert_eq!(escape_section("/*c*/ 'q'"), r"\/*c*/ \'q\'");
    }

    #[test]
    fn test_empty_key_is_quoted() {
        assert_eq!(escape_key(""), r#""""#);
        assert_eq!(escape_value(""), "");
    }

    #[test]
    fn test_quote_value() {
        assert_eq!(quote_value(r#"say "hi""#, '"'), r#""say \"hi\"""#);
        assert_eq!(quote_value("a=b", '\''), "'a=b'");
    }

    #[test]
    fn test_escape_then_unescape_restores_text() {
        for text in ["a=b", r"C:\dir", "x # y ; z", "it's \"quoted\"", " pad "] {
            let rendered = escape_value(text);
            let inner = rendered
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .filter(|_| text.starts_with(' '))
                .unwrap_or(&rendered);
            assert_eq!(unescape_value(inner), text);
        }
    }
}
