//! Input normalization into a working list of line fragments.

use crate::rules::patterns::{FRAGMENT_SEPARATOR, INPUT_WHITESPACE};

/// Split free text into trimmed, non-empty fragments. Newlines, commas
/// and full-width commas all separate fragments.
pub(crate) fn split_fragments(text: &str) -> Vec<String> {
    let collapsed = INPUT_WHITESPACE.replace_all(text, " ");
    let mut lines: Vec<String> = FRAGMENT_SEPARATOR
        .split(collapsed.trim())
        .map(str::to_string)
        .collect();
    remove_empty(&mut lines);
    lines
}

/// Trim every fragment in place and drop the ones left empty.
pub(crate) fn remove_empty(lines: &mut Vec<String>) {
    lines.retain_mut(|line| {
        let trimmed = line.trim();
        if trimmed.len() != line.len() {
            *line = trimmed.to_string();
        }
        !line.is_empty()
    });
}
