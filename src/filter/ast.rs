// src/filter/ast.rs

use std::collections::HashMap;
use std::fmt;

use crate::filter::parser::{self, ParseOutput, AND_SEPARATOR, OR_SEPARATOR, TAG_PREFIX};

/// A single `tag:<key>=<value>` equality check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagCondition {
    pub key: String,
    pub value: String,
}

impl TagCondition {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Exact, case-sensitive comparison against the tag with the same key.
    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        tags.get(self.key.as_str())
            .is_some_and(|value| *value == self.value)
    }
}

/// Conditions joined by `AND`; all of them must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndGroup {
    pub conditions: Vec<TagCondition>,
}

impl AndGroup {
    pub fn new(conditions: Vec<TagCondition>) -> Self {
        Self { conditions }
    }

    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        self.conditions.iter().all(|c| c.matches(tags))
    }
}

/// Groups joined by `OR`; the filter matches when any group matches.
///
/// A filter with no groups (e.g. parsed from an empty string) matches
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub groups: Vec<AndGroup>,
}

impl TagFilter {
    pub fn new(groups: Vec<AndGroup>) -> Self {
        Self { groups }
    }

    /// Parse a filter string. Never fails; see [`parser`] for how unusable
    /// tokens are handled.
    pub fn parse(source: &str) -> Self {
        parser::parse(source).filter
    }

    /// Parse a filter string and also return the tokens that were dropped.
    pub fn parse_with_diagnostics(source: &str) -> ParseOutput {
        parser::parse(source)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Evaluate against an already-deduplicated tag map.
    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        self.groups.iter().any(|g| g.matches(tags))
    }

    /// Evaluate against raw `(key, value)` pairs, as returned by tag listing
    /// APIs. Pairs are collapsed into a map first; the last value for a
    /// repeated key wins.
    pub fn matches_pairs<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.groups.is_empty() {
            return false;
        }
        let tags: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.matches(&tags)
    }
}

impl fmt::Display for TagCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{TAG_PREFIX}{}={}",
            render_atom(&self.key, true),
            render_atom(&self.value, false)
        )
    }
}

impl fmt::Display for AndGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(AND_SEPARATOR)?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

/// Renders canonical filter syntax; parsing the output yields an equal
/// filter as long as no key or value contains a double quote.
impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(OR_SEPARATOR)?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

fn render_atom(atom: &str, is_key: bool) -> String {
    let needs_quotes =
        atom.chars().any(char::is_whitespace) || (is_key && atom.contains('='));
    if needs_quotes {
        format!("\"{atom}\"")
    } else {
        atom.to_string()
    }
}
