use crate::comments::CommentFilter;
use crate::error::{ConfigError, ParseResult};
use crate::escaping::{unescape_key, unescape_value};
use crate::keys::qualify;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use std::ops::Range;

#[derive(Parser)]
#[grammar = "keyvalue.pest"]
pub struct LineParser;

/// What a single comment-filtered line contains
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Nothing but whitespace
    Blank,

    /// Section header: [name]
    Section { name: String },

    /// Assignment: key = value
    Pair {
        key: String,
        value: String,
        /// Byte range of the value token in the line, quotes included
        value_span: Range<usize>,
        /// Quote character the value was written with, if any
        quote: Option<char>,
    },
}

impl LineParser {
    /// Parse one line whose comments have already been blanked out
    pub fn parse_line(line: &str) -> ParseResult<ParsedLine> {
        let line_pair = LineParser::parse(Rule::line, line)?
            .next()
            .ok_or_else(|| ConfigError::parse(1, 1, "empty parse result"))?;

        let Some(inner) = line_pair.into_inner().next() else {
            return Ok(ParsedLine::Blank);
        };

        match inner.as_rule() {
            Rule::section_line => {
                let name = inner
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::section_name)
                    .map(|p| unescape_key(p.as_str()))
                    .unwrap_or_default();
                Ok(ParsedLine::Section { name })
            }
            Rule::pair_line => Self::parse_pair(inner),
            _ => Ok(ParsedLine::Blank),
        }
    }

    fn parse_pair(pair: Pair<Rule>) -> ParseResult<ParsedLine> {
        let (line, column) = pair.as_span().start_pos().line_col();
        let mut key = None;
        let mut value = None;
        let mut separator_end = 0;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::key => key = Some(Self::token_text(inner).0),
                Rule::separator => separator_end = inner.as_span().end(),
                Rule::value => {
                    let span = inner.as_span().start()..inner.as_span().end();
                    let (text, quote) = Self::token_text(inner);
                    value = Some((text, span, quote));
                }
                _ => {}
            }
        }

        let key = key
            .map(|k| unescape_key(&k))
            .ok_or_else(|| ConfigError::parse(line, column, "missing key"))?;

        let (value, value_span, quote) = match value {
            Some((text, span, quote)) => (unescape_value(&text), span, quote),
            None => (String::new(), separator_end..separator_end, None),
        };

        Ok(ParsedLine::Pair {
            key,
            value,
            value_span,
            quote,
        })
    }

    /// Raw text of a key or value token and the quote it was wrapped in
    fn token_text(token: Pair<Rule>) -> (String, Option<char>) {
        let Some(inner) = token.into_inner().next() else {
            return (String::new(), None);
        };

        match inner.as_rule() {
            Rule::quoted => {
                let quote = inner.as_str().chars().next();
                let text = inner
                    .into_inner()
                    .next()
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default();
                (text, quote)
            }
            _ => (inner.as_str().to_string(), None),
        }
    }
}

/// A raw file line after comment filtering, parsing and section tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ScannedLine {
    /// Blank, comment-only, inside a comment block or unparseable
    Ignored,

    /// Section header; the scanner has switched to this section
    Section(String),

    /// Association with its key qualified by the current section
    Entry {
        key: String,
        value: String,
        value_span: Range<usize>,
        quote: Option<char>,
    },
}

/// Walks the lines of one file, keeping comment and section state
#[derive(Debug, Default)]
pub struct LineScanner {
    filter: CommentFilter,
    section: String,
}

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section the next entry will belong to
    pub fn current_section(&self) -> &str {
        &self.section
    }

    /// Whether the lines scanned so far left a comment block open
    pub fn is_inside_block(&self) -> bool {
        self.filter.is_inside_block()
    }

    /// Classify the next raw line of the file
    pub fn scan(&mut self, raw: &str) -> ScannedLine {
        let filtered = self.filter.filter(raw);
        if !filtered.has_content() {
            return ScannedLine::Ignored;
        }

        match LineParser::parse_line(&filtered.text) {
            Ok(ParsedLine::Section { name }) => {
                self.section = name.clone();
                ScannedLine::Section(name)
            }
            Ok(ParsedLine::Pair {
                key,
                value,
                value_span,
                quote,
            }) => ScannedLine::Entry {
                key: qualify(&self.section, &key),
                value,
                value_span,
                quote,
            },
            Ok(ParsedLine::Blank) => ScannedLine::Ignored,
            Err(err) => {
                tracing::trace!(line = raw, error = %err, "Skipping line without association");
                ScannedLine::Ignored
            }
        }
    }
}
