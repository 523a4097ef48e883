//! The generic default ruleset, used when a territory has no usable data.

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::models::ruleset::{RulesetData, TerritoryRuleset};

/// Rules for an unknown territory: trailing digits are a postal code, the
/// one or two words before it a region, the words before that a locality.
const GENERIC_RULES: &str = r#"{
    "formats": {
        "default": "{streetAddress}\n{locality} {region} {postalCode}\n{country}",
        "nocountry": "{streetAddress}\n{locality} {region} {postalCode}"
    },
    "startAt": "end",
    "fields": [
        {
            "name": "postalCode",
            "line": "startAtLast",
            "pattern": "[0-9]+$"
        },
        {
            "name": "region",
            "line": "last",
            "pattern": "(?:[A-Za-zÀÁÈÉÌÍÑÒÓÙÚÜàáèéìíñòóùúü\\.\\-']+\\s*){1,2}$"
        },
        {
            "name": "locality",
            "line": "last",
            "pattern": "(?:[A-Za-zÀÁÈÉÌÍÑÒÓÙÚÜàáèéìíñòóùúü\\.\\-']+\\s*){1,2}$"
        }
    ],
    "fieldNames": {
        "streetAddress": "Street Address",
        "locality": "City",
        "postalCode": "Zip Code",
        "region": "State",
        "country": "Country"
    }
}"#;

lazy_static! {
    static ref GENERIC: Arc<TerritoryRuleset> = {
        let data: RulesetData = serde_json::from_str(GENERIC_RULES).unwrap();
        Arc::new(TerritoryRuleset::compile(data).unwrap())
    };
}

/// Shared handle to the generic default ruleset.
pub fn ruleset() -> Arc<TerritoryRuleset> {
    GENERIC.clone()
}
