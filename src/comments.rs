//! Comment filtering
//!
//! Line comments start at `;` or `#` and run to the end of the line. Block
//! comments run from `/*` to `*/` and may span several lines, so the filter
//! carries an "inside block" flag from one line to the next. Create one
//! filter per pass over a file.
//!
//! Comment text is blanked out with spaces rather than removed: byte offsets
//! into a filtered line are byte offsets into the raw line, which lets the
//! serializer patch a value in place.

use crate::syntax::{
    COMMENT_BLOCK_BEGIN, COMMENT_BLOCK_END, ESCAPE_CHARACTER, KEY_VALUE_SEPARATOR,
    is_line_comment, is_string_identifier,
};

const ESCAPE: u8 = ESCAPE_CHARACTER as u8;

/// A line with its comments blanked out
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredLine {
    /// Same length as the input line, comments replaced by spaces
    pub text: String,
    /// False when the line ended inside an unterminated comment block
    pub complete: bool,
}

impl FilteredLine {
    /// Whether anything besides whitespace survived filtering
    pub fn has_content(&self) -> bool {
        self.complete && !self.text.trim().is_empty()
    }
}

/// Running comment state over the lines of one file
#[derive(Debug, Default, Clone)]
pub struct CommentFilter {
    inside_block: bool,
}

impl CommentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous line left a comment block open
    pub fn is_inside_block(&self) -> bool {
        self.inside_block
    }

    /// Forget any open comment block
    pub fn reset(&mut self) {
        self.inside_block = false;
    }

    /// Blank out the comments of one line
    pub fn filter(&mut self, line: &str) -> FilteredLine {
        let mut bytes = line.as_bytes().to_vec();
        let begin = COMMENT_BLOCK_BEGIN.as_bytes();
        let end = COMMENT_BLOCK_END.as_bytes();
        let mut quote: Option<u8> = None;
        let mut i = 0;

        while i < bytes.len() {
            if self.inside_block {
                if bytes[i..].starts_with(end) {
                    blank(&mut bytes, i, i + end.len());
                    self.inside_block = false;
                    i += end.len();
                } else {
                    bytes[i] = b' ';
                    i += 1;
                }
                continue;
            }

            let b = bytes[i];
            if b == ESCAPE {
                i += 2;
                continue;
            }

            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                i += 1;
                continue;
            }

            if is_string_identifier(b)
                && opens_token(&bytes, i)
                && closing_quote(&bytes, i + 1, b).is_some()
            {
                quote = Some(b);
            } else if bytes[i..].starts_with(begin) {
                blank(&mut bytes, i, i + begin.len());
                self.inside_block = true;
                i += begin.len();
                continue;
            } else if is_line_comment(b) {
                let len = bytes.len();
                blank(&mut bytes, i, len);
                break;
            }
            i += 1;
        }

        FilteredLine {
            // Only whole characters were blanked, so this never replaces anything
            text: String::from_utf8_lossy(&bytes).into_owned(),
            complete: !self.inside_block,
        }
    }
}

fn blank(bytes: &mut [u8], from: usize, to: usize) {
    let to = to.min(bytes.len());
    for b in &mut bytes[from..to] {
        *b = b' ';
    }
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

/// A quote at `at` may only open a span at the start of a key or value
fn opens_token(bytes: &[u8], at: usize) -> bool {
    match at.checked_sub(1).map(|prev| bytes[prev]) {
        None => true,
        Some(prev) => is_blank(prev) || prev == KEY_VALUE_SEPARATOR as u8,
    }
}

/// Whether a quote at `at` ends its token
fn closes_token(bytes: &[u8], at: usize) -> bool {
    let rest = &bytes[at + 1..];
    match rest.first() {
        None => true,
        Some(&next) => {
            is_blank(next)
                || next == KEY_VALUE_SEPARATOR as u8
                || is_line_comment(next)
                || rest.starts_with(COMMENT_BLOCK_BEGIN.as_bytes())
        }
    }
}

/// Position of the first unescaped `quote` after `from`, if it ends a token.
///
/// `it's # isn't` has no quoted span: the first `'` follows a letter.
fn closing_quote(bytes: &[u8], from: usize, quote: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == ESCAPE {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            return closes_token(bytes, i).then_some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_all(lines: &[&str]) -> Vec<FilteredLine> {
        let mut filter = CommentFilter::new();
        lines.iter().map(|line| filter.filter(line)).collect()
    }

    #[test]
    fn test_line_comment_truncates() {
        let out = filter_all(&["key=value # trailing comment"]);
        assert_eq!(out[0].text.trim_end(), "key=value");
        assert!(out[0].complete);

        let out = filter_all(&["key=value ; other"]);
        assert_eq!(out[0].text.trim_end(), "key=value");
    }

    #[test]
    fn test_offsets_are_preserved() {
        let line = "a=1 /* note */ # tail";
        let out = filter_all(&[line]);
        assert_eq!(out[0].text.len(), line.len());
        assert_eq!(out[0].text.trim_end(), "a=1");
    }

    #[test]
    fn test_comment_marker_inside_quotes() {
        let out = filter_all(&[r##"color="#ff0000" # red"##]);
        assert_eq!(out[0].text.trim_end(), r##"color="#ff0000""##);
    }

    #[test]
    fn test_unbalanced_quote_is_literal() {
        let out = filter_all(&["msg=it's # note"]);
        assert_eq!(out[0].text.trim_end(), "msg=it's");
    }

    #[test]
    fn test_apostrophes_inside_words_do_not_quote() {
        let out = filter_all(&["msg=it's # isn't"]);
        assert_eq!(out[0].text.trim_end(), "msg=it's");

        let out = filter_all(&["k = 'a'b # c'"]);
        assert_eq!(out[0].text.trim_end(), "k = 'a'b");
    }

    #[test]
    fn test_quoted_key_and_value() {
        let out = filter_all(&["\"a # b\" = 'c ; d' ; tail"]);
        assert_eq!(out[0].text.trim_end(), "\"a # b\" = 'c ; d'");
    }

    #[test]
    fn test_escaped_marker_is_literal() {
        let out = filter_all(&[r"tag=\#1 # real"]);
        assert_eq!(out[0].text.trim_end(), r"tag=\#1");
    }

    #[test]
    fn test_block_spans_lines() {
        let out = filter_all(&[
            "before=1",
            "/* Multiline",
            "NotAKey=This is a comment",
            "*/ IsAKey=but this is not",
            "after=2",
        ]);
        assert!(out[0].has_content());
        assert!(!out[1].complete);
        assert!(!out[2].complete);
        assert!(!out[2].has_content());
        assert!(out[3].complete);
        assert_eq!(out[3].text.trim(), "IsAKey=but this is not");
        assert_eq!(out[4].text, "after=2");
    }

    #[test]
    fn test_block_on_single_line() {
        let out = filter_all(&["a=/* inline */1"]);
        assert!(out[0].complete);
        assert_eq!(out[0].text.replace(' ', ""), "a=1");
    }

    #[test]
    fn test_line_ending_inside_block_is_incomplete() {
        let mut filter = CommentFilter::new();
        let line = filter.filter("key=value /* opens");
        assert!(!line.complete);
        assert!(filter.is_inside_block());

        filter.reset();
        assert!(!filter.is_inside_block());
        assert!(filter.filter("next=1").complete);
    }

    #[test]
    fn test_fresh_filters_are_independent() {
        let mut first = CommentFilter::new();
        first.filter("/* never closed");
        let mut second = CommentFilter::new();
        assert!(second.filter("key=value").complete);
    }

    #[test]
    fn test_multibyte_comment_text() {
        let out = filter_all(&["k=v # café ünïcode"]);
        assert_eq!(out[0].text.trim_end(), "k=v");
    }
}
