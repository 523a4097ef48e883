//! Finding the destination country in the first or last fragment.

use std::sync::Arc;

use crate::data::CountryNames;

use super::script::is_asian_char;

/// A country name found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountryMatch {
    /// Fragment index.
    pub line: usize,
    /// Byte range of the name inside the fragment.
    pub start: usize,
    pub end: usize,
    pub code: String,
}

impl CountryMatch {
    /// The name as written in the input.
    pub fn text<'a>(&self, lines: &'a [String]) -> &'a str {
        &lines[self.line][self.start..self.end]
    }

    /// Remove the name from its fragment.
    pub fn cut(&self, lines: &mut [String]) {
        let line = &mut lines[self.line];
        line.replace_range(self.start..self.end, "");
    }
}

fn chars_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte length of `subject`'s prefix equal to `query`, ignoring case.
pub(crate) fn prefix_len(subject: &str, query: &str) -> Option<usize> {
    let mut rest = subject.char_indices();
    for q in query.chars() {
        let (_, s) = rest.next()?;
        if !chars_eq(s, q) {
            return None;
        }
    }
    Some(rest.next().map_or(subject.len(), |(i, _)| i))
}

/// Byte offset where a suffix of `subject` equal to `query` starts,
/// ignoring case.
pub(crate) fn suffix_start(subject: &str, query: &str) -> Option<usize> {
    let mut rest = subject.char_indices().rev();
    let mut start = subject.len();
    for q in query.chars().rev() {
        let (i, s) = rest.next()?;
        if !chars_eq(s, q) {
            return None;
        }
        start = i;
    }
    Some(start)
}

/// `name` at the start of `line`, not running on into a Latin word.
fn leading(line: &str, name: &str) -> Option<usize> {
    let end = prefix_len(line, name)?;
    match line[end..].chars().next() {
        Some(next) if next.is_alphanumeric() && !is_asian_char(next) => None,
        _ => Some(end),
    }
}

/// `name` at the end of `line`, preceded by whitespace or nothing.
fn trailing(line: &str, name: &str) -> Option<usize> {
    let start = suffix_start(line, name)?;
    match line[..start].chars().next_back() {
        Some(prev) if !prev.is_whitespace() => None,
        _ => Some(start),
    }
}

/// Longest name of one table found at the start of the first fragment or
/// the end of the last.
fn find_in_table(lines: &[String], table: &CountryNames) -> Option<CountryMatch> {
    let first = lines.first()?;
    let last_index = lines.len() - 1;
    let last = &lines[last_index];

    // entries come longest first
    table.iter().find_map(|(name, code)| {
        if let Some(end) = leading(first, name) {
            return Some(CountryMatch {
                line: 0,
                start: 0,
                end,
                code: code.to_string(),
            });
        }
        trailing(last, name).map(|start| CountryMatch {
            line: last_index,
            start,
            end: last.len(),
            code: code.to_string(),
        })
    })
}

/// Search the tables in order; the first table with a hit decides.
pub(crate) fn find_country(lines: &[String], tables: &[Arc<CountryNames>]) -> Option<CountryMatch> {
    tables.iter().find_map(|table| find_in_table(lines, table))
}
