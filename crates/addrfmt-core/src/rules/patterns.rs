//! Common regex patterns for address normalization and templates.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Free-text input
    pub static ref INPUT_WHITESPACE: Regex = Regex::new(r"[ \t\r]+").unwrap();

    pub static ref FRAGMENT_SEPARATOR: Regex = Regex::new(r"[,，\n]").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Template placeholders: {fieldName}
    pub static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").unwrap();

    // Formatted output cleanup
    pub static ref HORIZONTAL_SPACE: Regex = Regex::new(r"[ \t]+").unwrap();

    pub static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").unwrap();
}
