//! The field-rule interpreter.
//!
//! Rules run strictly in their declared order. Each rule looks at the
//! fragment(s) its line selector names, and on the first hit moves the
//! matched text out of the fragment and into the address.

use regex::Regex;
use tracing::trace;

use crate::models::address::Address;
use crate::models::ruleset::{FieldMatcher, FieldRule, LineSelector, ScriptFormat, StartAt};
use crate::rules::patterns::WHITESPACE_RUN;

use super::detect::{prefix_len, suffix_start};
use super::lines::remove_empty;

/// A field value cut out of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cut {
    value: String,
    rest: String,
}

/// Trim a value and drop one leading `-` and any trailing ones.
fn clean_value(raw: &str) -> String {
    let value = raw.trim();
    let value = value.strip_prefix('-').unwrap_or(value);
    value.trim_end_matches('-').trim_end().to_string()
}

fn join_rest(before: &str, after: &str, script: ScriptFormat) -> String {
    let joined = match script {
        ScriptFormat::Latin => format!("{before} {after}"),
        ScriptFormat::Asian => format!("{before}{after}"),
    };
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

fn match_regex(
    line: &str,
    regex: &Regex,
    group: usize,
    start_at: StartAt,
    script: ScriptFormat,
) -> Option<Cut> {
    let captures = match start_at {
        StartAt::End => regex.captures_iter(line).last(),
        StartAt::Start => regex.captures(line),
    }?;
    let found = captures.get(group)?;

    let value = clean_value(found.as_str());
    if value.is_empty() {
        return None;
    }

    Some(Cut {
        value,
        rest: join_rest(&line[..found.start()], &line[found.end()..], script),
    })
}

fn match_literals(line: &str, items: &[String], start_at: StartAt) -> Option<Cut> {
    items.iter().find_map(|item| match start_at {
        StartAt::Start => prefix_len(line, item).map(|end| Cut {
            value: line[..end].to_string(),
            rest: line[end..].trim().to_string(),
        }),
        StartAt::End => suffix_start(line, item)
            .filter(|&start| {
                line[..start]
                    .chars()
                    .next_back()
                    .is_none_or(char::is_whitespace)
            })
            .map(|start| Cut {
                value: line[start..].to_string(),
                rest: line[..start].trim().to_string(),
            }),
    })
}

fn try_line(
    line: &str,
    matcher: &FieldMatcher,
    rule: &FieldRule,
    start_at: StartAt,
    script: ScriptFormat,
) -> Option<Cut> {
    match matcher {
        FieldMatcher::Regex { regex, .. } => {
            match_regex(line, regex, rule.match_group, start_at, script)
        }
        FieldMatcher::Literals(items) => match_literals(line, items, start_at),
    }
}

/// Fragment indices a selector tests, in scan order.
fn candidates(selector: LineSelector, len: usize) -> Vec<usize> {
    match selector {
        LineSelector::First => vec![0],
        LineSelector::Last | LineSelector::Unknown => vec![len - 1],
        LineSelector::StartAtFirst => (0..len).collect(),
        LineSelector::StartAtLast => (0..len).rev().collect(),
    }
}

/// Run `rules` over `lines`, filling `address`. Leftover fragments stay
/// in `lines`, trimmed and non-empty.
pub(crate) fn apply_rules(
    lines: &mut Vec<String>,
    rules: &[FieldRule],
    start_at: StartAt,
    script: ScriptFormat,
    address: &mut Address,
) {
    for rule in rules {
        remove_empty(lines);
        if lines.is_empty() {
            break;
        }

        let Some(matcher) = &rule.matcher else {
            // no pattern: the whole selected fragment is the value
            let index = match rule.line {
                LineSelector::First | LineSelector::StartAtFirst => 0,
                _ => lines.len() - 1,
            };
            let whole = lines.remove(index);
            trace!("{} takes fragment {}: {:?}", rule.name, index, whole);
            address.set(rule.name, Some(whole));
            continue;
        };

        let hit = candidates(rule.line, lines.len())
            .into_iter()
            .find_map(|i| try_line(&lines[i], matcher, rule, start_at, script).map(|cut| (i, cut)));

        if let Some((index, cut)) = hit {
            trace!("{} = {:?}, fragment {} now {:?}", rule.name, cut.value, index, cut.rest);
            lines[index] = cut.rest;
            address.set(rule.name, Some(cut.value));
        }
    }
    remove_empty(lines);
}
