//! Describing a template for UI builders: rows of labelled components.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{CodeName, CountryNames};
use crate::models::ruleset::{ScriptFormat, TerritoryRuleset};
use crate::rules::patterns::PLACEHOLDER;

/// What a UI can enforce for a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    /// A regular expression the value should match.
    Pattern(String),
    /// A fixed set of choices.
    Choices(Vec<CodeName>),
}

/// One input field of an address form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatComponent {
    pub component: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

/// A line of the form.
pub type FormatRow = Vec<FormatComponent>;

/// Datasets the description is built from.
pub(crate) struct InfoSources<'a> {
    pub rules: &'a TerritoryRuleset,
    pub script: ScriptFormat,
    pub template: &'a str,
    /// Untranslated label to translated label.
    pub labels: Option<&'a Value>,
    pub countries: Option<&'a CountryNames>,
    /// `regionnames` data, keyed by territory.
    pub regions: Option<&'a Value>,
    pub region: Option<&'a str>,
}

impl InfoSources<'_> {
    fn label(&self, name: &str) -> String {
        let Some(untranslated) = self.rules.field_label(name) else {
            return name.to_string();
        };
        self.labels
            .and_then(|labels| labels.get(untranslated))
            .and_then(Value::as_str)
            .unwrap_or(untranslated)
            .to_string()
    }

    fn region_choices(&self) -> Option<Vec<CodeName>> {
        let list = self.regions?.get(self.region?)?;
        serde_json::from_value(list.clone()).ok()
    }

    fn constraint(&self, name: &str) -> Option<Constraint> {
        match name {
            "country" => self.countries.map(|c| Constraint::Choices(c.choices())),
            "region" => self
                .region_choices()
                .map(Constraint::Choices)
                .or_else(|| self.pattern(name)),
            _ => self.pattern(name),
        }
    }

    fn pattern(&self, name: &str) -> Option<Constraint> {
        self.rules
            .field_rule(self.script, name)?
            .matcher
            .as_ref()?
            .pattern_source()
            .map(|p| Constraint::Pattern(p.to_string()))
    }

    /// One row per template line that has placeholders.
    pub fn rows(&self) -> Vec<FormatRow> {
        self.template
            .split('\n')
            .map(|line| {
                PLACEHOLDER
                    .captures_iter(line)
                    .map(|caps| {
                        let name = &caps[1];
                        FormatComponent {
                            component: name.to_string(),
                            label: self.label(name),
                            constraint: self.constraint(name),
                        }
                    })
                    .collect::<FormatRow>()
            })
            .filter(|row| !row.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rules() -> TerritoryRuleset {
        TerritoryRuleset::from_value(
            "und-QQ",
            &json!({
                "formats": {"default": "{streetAddress}\n{locality} {region} {postalCode}\n{country}"},
                "fields": [
                    {"name": "postalCode", "line": "startAtLast", "pattern": "[0-9]{5}"},
                    {"name": "region", "line": "last", "pattern": ["Alabama", "Alaska"]},
                    {"name": "locality", "line": "last", "pattern": "[a-z ]+$"}
                ],
                "fieldNames": {"streetAddress": "Street Address", "locality": "City",
                               "region": "State", "postalCode": "Zip Code"}
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_rows_and_labels() {
        let rules = rules();
        let labels = json!({"City": "Ciudad"});
        let sources = InfoSources {
            rules: &rules,
            script: ScriptFormat::Latin,
            template: "{streetAddress}\n{locality} {region} {postalCode}\n\n{country}",
            labels: Some(&labels),
            countries: None,
            regions: None,
            region: Some("QQ"),
        };

        let rows = sources.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].label, "Street Address");
        assert_eq!(rows[1][0].label, "Ciudad");
        // region rule is a literal list, which gives no pattern
        assert_eq!(rows[1][1].constraint, None);
        assert_eq!(rows[1][2].constraint, Some(Constraint::Pattern("[0-9]{5}".to_string())));
        // no label for country: the component name stands in
        assert_eq!(rows[2][0].label, "country");
        assert_eq!(rows[2][0].constraint, None);
    }

    #[test]
    fn test_choice_constraints() {
        let rules = rules();
        let regions = json!({"QQ": [{"code": "AL", "name": "Alabama"}]});
        let countries = CountryNames::from_pairs([("Albania", "AL"), ("World", "001")]);
        let sources = InfoSources {
            rules: &rules,
            script: ScriptFormat::Latin,
            template: "{region}\n{country}",
            labels: None,
            countries: Some(&countries),
            regions: Some(&regions),
            region: Some("QQ"),
        };

        let rows = sources.rows();
        assert_eq!(
            rows[0][0].constraint,
            Some(Constraint::Choices(vec![CodeName {
                code: "AL".to_string(),
                name: "Alabama".to_string()
            }]))
        );
        match &rows[1][0].constraint {
            Some(Constraint::Choices(choices)) => assert_eq!(choices.len(), 1),
            other => panic!("unexpected constraint {other:?}"),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let component = FormatComponent {
            component: "postalCode".to_string(),
            label: "Zip Code".to_string(),
            constraint: Some(Constraint::Pattern("[0-9]{5}".to_string())),
        };
        assert_eq!(
            serde_json::to_value(&component).unwrap(),
            json!({"component": "postalCode", "label": "Zip Code", "constraint": "[0-9]{5}"})
        );
    }
}
