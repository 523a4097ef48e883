//! Country-name tables used for detection and UI choices.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::DataError;
use crate::models::embedded::NATIVE_COUNTRY_NAMES;

/// Codes that name groupings or sentinels rather than countries.
const AGGREGATE_CODES: [&str; 5] = ["AQ", "EU", "EZ", "UN", "ZZ"];

/// A code with its display name, for choice lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

/// Display names mapped to territory codes for one language.
///
/// Entries are kept longest name first, so the first hit of a scan is
/// also the longest one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryNames {
    entries: Vec<(String, String)>,
}

impl CountryNames {
    /// Build a table from `(name, code)` pairs.
    pub fn from_pairs<I, N, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(n, c)| (n.into(), c.into()))
            .filter(|(n, _)| !n.is_empty())
            .collect();
        entries.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });
        Self { entries }
    }

    /// Parse a `{"name": "CODE", ...}` object. Non-string values (such as
    /// the `generated` marker) are skipped.
    pub fn from_value(spec: &str, value: &Value) -> Result<Self, DataError> {
        let object = value
            .as_object()
            .ok_or_else(|| DataError::malformed("ctrynames", spec, "expected an object"))?;

        Ok(Self::from_pairs(
            object
                .iter()
                .filter(|(name, _)| name.as_str() != "generated")
                .filter_map(|(name, code)| code.as_str().map(|c| (name.as_str(), c))),
        ))
    }

    /// `(name, code)` entries, longest name first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Code for a name, compared case-insensitively.
    pub fn code_for(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| n.to_lowercase() == wanted)
            .map(|(_, c)| c.as_str())
    }

    /// One `{code, name}` per real country, longest name kept, sorted by
    /// name with accents and case ignored.
    pub fn choices(&self) -> Vec<CodeName> {
        let mut by_code: HashMap<&str, &str> = HashMap::new();
        for (name, code) in self.iter() {
            if code.chars().any(|c| c.is_ascii_digit()) || AGGREGATE_CODES.contains(&code) {
                continue;
            }
            // longest first, so the first name seen for a code is kept
            by_code.entry(code).or_insert(name);
        }

        let mut choices: Vec<CodeName> = by_code
            .into_iter()
            .map(|(code, name)| CodeName {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect();
        choices.sort_by_cached_key(|c| (sort_key(&c.name), c.code.clone()));
        choices
    }
}

/// Accent-folded, lowercased collation key.
pub(crate) fn sort_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

lazy_static! {
    /// Every country's name in its own language(s).
    pub static ref NATIVE_NAMES: Arc<CountryNames> = Arc::new(
        serde_json::from_str::<Value>(NATIVE_COUNTRY_NAMES)
            .ok()
            .and_then(|v| CountryNames::from_value("native", &v).ok())
            .unwrap_or_default()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_longest_first() {
        let names = CountryNames::from_pairs([("USA", "US"), ("United States of America", "US"), ("Peru", "PE")]);
        let order: Vec<&str> = names.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["United States of America", "Peru", "USA"]);
    }

    #[test]
    fn test_from_value_skips_marker() {
        let value = json!({"generated": false, "Albania": "AL", "Shqipëri": "AL"});
        let names = CountryNames::from_value("en", &value).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names.code_for("albania"), Some("AL"));
        assert_eq!(names.code_for("SHQIPËRI"), Some("AL"));
        assert_eq!(names.code_for("Alba"), None);

        assert!(CountryNames::from_value("en", &json!(["Albania"])).is_err());
    }

    #[test]
    fn test_choices_filter_and_sort() {
        let names = CountryNames::from_pairs([
            ("Österreich", "AT"),
            ("Europäische Union", "EU"),
            ("Welt", "001"),
            ("Vereinigte Staaten", "US"),
            ("USA", "US"),
            ("Albanien", "AL"),
            ("Zypern", "CY"),
        ]);
        let choices = names.choices();
        let codes: Vec<&str> = choices.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["AL", "AT", "US", "CY"]);
        assert_eq!(choices[2].name, "Vereinigte Staaten");
    }

    #[test]
    fn test_sort_key_folds_accents() {
        assert_eq!(sort_key("Österreich"), "osterreich");
        assert_eq!(sort_key("Guǎngdōng"), "guangdong");
    }

    #[test]
    fn test_native_names_load() {
        assert!(!NATIVE_NAMES.is_empty());
        assert_eq!(NATIVE_NAMES.code_for("Deutschland"), Some("DE"));
        assert_eq!(NATIVE_NAMES.code_for("Österreich"), Some("AT"));
    }
}
