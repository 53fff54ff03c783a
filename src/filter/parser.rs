// src/filter/parser.rs

//! Two-level parser for the tag filter language.
//!
//! ```text
//! filter    := and_group (" OR " and_group)*
//! and_group := condition (" AND " condition)*
//! condition := "tag:" key "=" value
//! ```
//!
//! Separators are the literal, space-delimited words `AND` / `OR`. The
//! source is cut on ` OR ` first and each piece on ` AND ` second, so when
//! separators overlap ` OR ` wins: `tag:a=b AND OR tag:c=d` is the two
//! groups `a="b AND"` and `c=d`.
//!
//! A balanced pair of double quotes is never cut, so `tag:Team="R AND D"` is
//! one condition whose value is `R AND D`. A quote that is never closed does
//! not swallow the rest of the input: the piece containing it is cut
//! literally, as if no quotes existed, and is reported in
//! [`ParseOutput::stray_quotes`].
//!
//! Parsing is total:
//! - keys and values are trimmed (then unquoted);
//! - a token without the `tag:` prefix, or without an `=`, is dropped from
//!   its group and recorded in [`ParseOutput::dropped`];
//! - a group left with no conditions is dropped entirely, so it can never
//!   turn into an always-true clause.

use crate::filter::ast::{AndGroup, TagCondition, TagFilter};

pub const TAG_PREFIX: &str = "tag:";
pub const AND_SEPARATOR: &str = " AND ";
pub const OR_SEPARATOR: &str = " OR ";

/// Result of parsing a filter string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub filter: TagFilter,
    /// Non-blank tokens that were not valid conditions, in source order.
    pub dropped: Vec<String>,
    /// Pieces of the source holding an unmatched `"`; they were split
    /// without quote handling.
    pub stray_quotes: Vec<String>,
}

/// Parse `source` into a [`TagFilter`]. Never fails.
pub fn parse(source: &str) -> ParseOutput {
    let mut parser = Parser::default();
    let filter = parser.parse_filter(source);
    ParseOutput {
        filter,
        dropped: parser.dropped,
        stray_quotes: parser.stray_quotes,
    }
}

#[derive(Default)]
struct Parser {
    dropped: Vec<String>,
    stray_quotes: Vec<String>,
}

impl Parser {
    fn parse_filter(&mut self, source: &str) -> TagFilter {
        let groups = self
            .split(source, OR_SEPARATOR)
            .into_iter()
            .filter_map(|piece| self.parse_and_group(piece))
            .collect();
        TagFilter::new(groups)
    }

    fn parse_and_group(&mut self, source: &str) -> Option<AndGroup> {
        let mut conditions = Vec::new();
        for token in self.split(source, AND_SEPARATOR) {
            match parse_condition(token) {
                Some(condition) => conditions.push(condition),
                None => {
                    let token = token.trim();
                    if !token.is_empty() {
                        self.dropped.push(token.to_string());
                    }
                }
            }
        }
        (!conditions.is_empty()).then(|| AndGroup::new(conditions))
    }

    /// Cut `source` on every `separator` outside balanced quotes.
    fn split<'s>(&mut self, source: &'s str, separator: &str) -> Vec<&'s str> {
        let mut pieces = Vec::new();
        let mut start = 0;

        loop {
            let cut = match scan(source, start, separator, true) {
                Cut::Unterminated => {
                    let literal = scan(source, start, separator, false);
                    let end = match literal {
                        Cut::At(i) => i,
                        _ => source.len(),
                    };
                    self.record_stray_quote(source[start..end].trim());
                    literal
                }
                cut => cut,
            };

            match cut {
                Cut::At(i) => {
                    pieces.push(&source[start..i]);
                    start = i + separator.len();
                }
                _ => {
                    pieces.push(&source[start..]);
                    return pieces;
                }
            }
        }
    }

    // The ` OR ` pass and the ` AND ` pass can both trip over the same quote.
    fn record_stray_quote(&mut self, piece: &str) {
        if !self.stray_quotes.iter().any(|seen| seen.contains(piece)) {
            self.stray_quotes.push(piece.to_string());
        }
    }
}

enum Cut {
    /// Separator found at this byte offset.
    At(usize),
    End,
    /// Reached the end inside an open quote.
    Unterminated,
}

fn scan(source: &str, from: usize, separator: &str, honor_quotes: bool) -> Cut {
    let bytes = source.as_bytes();
    let mut in_quotes = false;

    for i in from..bytes.len() {
        if honor_quotes && bytes[i] == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && bytes[i..].starts_with(separator.as_bytes()) {
            // Separators start with an ASCII space, so `i` is a char boundary.
            return Cut::At(i);
        }
    }

    if in_quotes { Cut::Unterminated } else { Cut::End }
}

fn parse_condition(token: &str) -> Option<TagCondition> {
    let body = token.trim().strip_prefix(TAG_PREFIX)?;
    let eq = find_equals(body)?;
    let key = unquote(body[..eq].trim());
    let value = unquote(body[eq + 1..].trim());
    Some(TagCondition::new(key, value))
}

/// First `=` outside quotes; with an odd number of quotes, simply the first.
fn find_equals(body: &str) -> Option<usize> {
    if body.bytes().filter(|&b| b == b'"').count() % 2 == 1 {
        return body.find('=');
    }

    let mut in_quotes = false;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'=' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
