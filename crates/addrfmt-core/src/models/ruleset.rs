//! Territory rulesets: templates and field-extraction rules as data.
//!
//! A ruleset is deserialized from locale data as a [`RulesetData`] and
//! then compiled into a [`TerritoryRuleset`], which owns the compiled
//! regular expressions the parser runs.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::models::address::AddressField;

/// Script family an address is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFormat {
    /// Latin (or any non-CJK) script.
    #[default]
    Latin,
    /// Han, Kana, Hangul or Bopomofo.
    Asian,
}

impl ScriptFormat {
    /// Name used in data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latin => "latin",
            Self::Asian => "asian",
        }
    }
}

/// End of the address the rules generally work from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartAt {
    Start,
    #[default]
    End,
}

/// Which remaining line(s) a field rule is tested against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineSelector {
    /// Only the earliest remaining line.
    First,
    /// Only the latest remaining line.
    #[default]
    Last,
    /// Every line, scanning forward from the first.
    StartAtFirst,
    /// Every line, scanning backward from the last.
    StartAtLast,
    /// Unrecognized selector; treated like `Last`.
    #[serde(other)]
    Unknown,
}

/// A value that is either shared by all scripts or given per script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scripted<T> {
    ByScript(HashMap<ScriptFormat, T>),
    Uniform(T),
}

impl<T> Scripted<T> {
    /// Value for `script`, falling back to the Latin variant.
    pub fn get(&self, script: ScriptFormat) -> Option<&T> {
        match self {
            Self::Uniform(value) => Some(value),
            Self::ByScript(values) => values
                .get(&script)
                .or_else(|| values.get(&ScriptFormat::Latin)),
        }
    }

    /// Whether the value differs per script.
    pub fn is_by_script(&self) -> bool {
        matches!(self, Self::ByScript(_))
    }
}

/// Pattern of a field rule as written in data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternData {
    /// A regular expression.
    Regex(String),
    /// Literal strings tested against the start or end of a line.
    Literals(Vec<String>),
}

/// A field-extraction rule as written in data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRuleData {
    pub name: AddressField,
    #[serde(default)]
    pub line: LineSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternData>,
    #[serde(default)]
    pub match_group: usize,
}

/// A territory ruleset as written in data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetData {
    /// Style name to template (or per-script templates).
    #[serde(default)]
    pub formats: HashMap<String, Scripted<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Scripted<StartAt>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Scripted<Vec<FieldRuleData>>>,

    /// Field name to untranslated UI label.
    #[serde(default)]
    pub field_names: HashMap<String, String>,

    #[serde(default)]
    pub multiformat: bool,

    /// Separator for leftover lines in the street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_string: Option<Scripted<String>>,
}

/// Compiled matcher of a field rule.
#[derive(Debug, Clone)]
pub enum FieldMatcher {
    Regex { source: String, regex: Regex },
    Literals(Vec<String>),
}

impl FieldMatcher {
    /// The regex source, for UI constraints.
    pub fn pattern_source(&self) -> Option<&str> {
        match self {
            Self::Regex { source, .. } => Some(source),
            Self::Literals(_) => None,
        }
    }
}

/// A compiled field-extraction rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: AddressField,
    pub line: LineSelector,
    /// `None` takes the whole selected line.
    pub matcher: Option<FieldMatcher>,
    pub match_group: usize,
}

impl FieldRule {
    fn compile(data: FieldRuleData) -> Result<Self, DataError> {
        let matcher = match data.pattern {
            Some(PatternData::Regex(source)) => {
                let regex = RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .multi_line(true)
                    .build()
                    .map_err(|source| DataError::Pattern {
                        field: data.name.as_str().to_string(),
                        source,
                    })?;
                Some(FieldMatcher::Regex { source, regex })
            }
            Some(PatternData::Literals(items)) => Some(FieldMatcher::Literals(items)),
            None => None,
        };

        Ok(Self {
            name: data.name,
            line: data.line,
            matcher,
            match_group: data.match_group,
        })
    }
}

/// Labels used when a ruleset names none.
fn default_field_names() -> HashMap<String, String> {
    [
        ("streetAddress", "Street Address"),
        ("locality", "City"),
        ("postalCode", "Zip Code"),
        ("region", "State"),
        ("country", "Country"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// A compiled territory ruleset.
#[derive(Debug, Clone)]
pub struct TerritoryRuleset {
    formats: HashMap<String, Scripted<String>>,
    start_at: Scripted<StartAt>,
    fields: Scripted<Vec<FieldRule>>,
    field_names: HashMap<String, String>,
    multiformat: bool,
    join_string: Option<Scripted<String>>,
}

impl TerritoryRuleset {
    /// Compile raw data. Data without any format is rejected so that the
    /// caller substitutes the generic default.
    pub fn compile(data: RulesetData) -> Result<Self, DataError> {
        if data.formats.is_empty() {
            return Err(DataError::malformed("address", "?", "ruleset has no formats"));
        }

        let fields = match data.fields {
            Some(Scripted::Uniform(rules)) => Scripted::Uniform(
                rules.into_iter().map(FieldRule::compile).collect::<Result<_, _>>()?,
            ),
            Some(Scripted::ByScript(by_script)) => {
                let mut compiled = HashMap::with_capacity(by_script.len());
                for (script, rules) in by_script {
                    let rules = rules
                        .into_iter()
                        .map(FieldRule::compile)
                        .collect::<Result<Vec<_>, _>>()?;
                    compiled.insert(script, rules);
                }
                Scripted::ByScript(compiled)
            }
            None => Scripted::Uniform(Vec::new()),
        };

        let field_names = if data.field_names.is_empty() {
            default_field_names()
        } else {
            data.field_names
        };

        Ok(Self {
            formats: data.formats,
            start_at: data.start_at.unwrap_or(Scripted::Uniform(StartAt::End)),
            fields,
            field_names,
            multiformat: data.multiformat,
            join_string: data.join_string,
        })
    }

    /// Compile a ruleset straight from a JSON value.
    pub fn from_value(spec: &str, value: &serde_json::Value) -> Result<Self, DataError> {
        let data = RulesetData::deserialize(value)
            .map_err(|e| DataError::malformed("address", spec, e))?;
        Self::compile(data).map_err(|e| match e {
            DataError::Malformed { basename, reason, .. } => DataError::Malformed {
                basename,
                locale: spec.to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Whether fields and templates come in Latin and Asian variants.
    pub fn is_multiformat(&self) -> bool {
        self.multiformat
    }

    /// Template (or per-script templates) of a named style, if present.
    pub fn style(&self, name: &str) -> Option<&Scripted<String>> {
        self.formats.get(name)
    }

    /// Direction extraction proceeds from for the given script.
    pub fn start_at(&self, script: ScriptFormat) -> StartAt {
        self.start_at.get(script).copied().unwrap_or_default()
    }

    /// Field rules, in precedence order, for the given script.
    pub fn fields(&self, script: ScriptFormat) -> &[FieldRule] {
        self.fields.get(script).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rule extracting `name`, if any.
    pub fn field_rule(&self, script: ScriptFormat, name: &str) -> Option<&FieldRule> {
        self.fields(script).iter().find(|rule| rule.name.as_str() == name)
    }

    /// Untranslated UI label of a field.
    pub fn field_label(&self, name: &str) -> Option<&str> {
        self.field_names.get(name).map(String::as_str)
    }

    /// Separator for leftover street lines.
    pub fn join_string(&self, script: ScriptFormat) -> &str {
        match self.join_string.as_ref().and_then(|j| j.get(script)) {
            Some(join) => join,
            None if script == ScriptFormat::Asian => "",
            None => ", ",
        }
    }
}
