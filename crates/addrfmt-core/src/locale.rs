//! Locale tags and their data fallback chains.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Spec used for data that applies to every locale.
pub const ROOT_SPEC: &str = "root";

/// Language subtag for "undetermined".
const UNDETERMINED: &str = "und";

/// ISO 3166-1 alpha-2 codes that name a real territory.
const REGION_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Whether `code` is an assigned ISO 3166-1 alpha-2 territory code.
///
/// User-assigned codes such as `XX`, `QQ` or `ZZ` are not.
pub fn is_region_code(code: &str) -> bool {
    REGION_CODES.binary_search(&code).is_ok()
}

/// A parsed locale tag: `lang[-Script][-REGION]`.
///
/// Parsing is lenient: subtags are classified by shape, anything that
/// does not look like a language, script or region is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Locale {
    language: Option<String>,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Parse a locale tag. Both `-` and `_` separate subtags, and case is
    /// not significant. A lone uppercase two-letter tag (`DE`) names a
    /// region.
    pub fn new(tag: &str) -> Self {
        let mut locale = Self::default();

        let parts: Vec<&str> = tag.split(['-', '_']).filter(|p| !p.is_empty()).collect();
        let lone = parts.len() == 1;

        for (i, part) in parts.into_iter().enumerate() {
            let is_alpha = part.chars().all(|c| c.is_ascii_alphabetic());
            let is_digit = part.chars().all(|c| c.is_ascii_digit());
            let is_lower = part.chars().all(|c| c.is_ascii_lowercase());

            match part.len() {
                2 | 3 if i == 0 && is_alpha && (!lone || is_lower) => {
                    locale.language = Some(part.to_ascii_lowercase());
                }
                4 if is_alpha && locale.script.is_none() => {
                    let mut chars = part.chars();
                    let first = chars.next().map(|c| c.to_ascii_uppercase());
                    let script: String = first
                        .into_iter()
                        .chain(chars.map(|c| c.to_ascii_lowercase()))
                        .collect();
                    locale.script = Some(script);
                }
                2 if is_alpha && locale.region.is_none() => {
                    locale.region = Some(part.to_ascii_uppercase());
                }
                3 if is_digit && locale.region.is_none() => {
                    locale.region = Some(part.to_string());
                }
                _ => {}
            }
        }

        if locale.language.as_deref() == Some(UNDETERMINED) {
            locale.language = None;
        }

        locale
    }

    /// A region-only locale (`und-XX`), as used to look up territory data.
    pub fn for_region(region: &str) -> Self {
        Self {
            language: None,
            script: None,
            region: Some(region.to_ascii_uppercase()),
        }
    }

    /// Language subtag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Script subtag, if any.
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Copy of this locale with the language (and script) replaced by
    /// those of `other`.
    pub fn with_language_of(&self, other: &Locale) -> Self {
        Self {
            language: other.language.clone(),
            script: other.script.clone(),
            region: self.region.clone(),
        }
    }

    /// Whether the language is one written primarily in an Asian script.
    pub fn is_asian(&self) -> bool {
        matches!(self.language(), Some("zh" | "ja" | "ko"))
    }

    /// Normalized tag used as a cache key.
    pub fn spec(&self) -> String {
        Self::join(self.language(), self.script(), self.region())
    }

    /// Specs to try when looking up data for this locale, most specific
    /// first, ending with the root.
    pub fn fallback_chain(&self) -> Vec<String> {
        let lang = self.language();
        let script = self.script();
        let region = self.region();

        let mut chain: Vec<String> = Vec::with_capacity(6);
        let mut push = |spec: String| {
            if !chain.contains(&spec) {
                chain.push(spec);
            }
        };

        if lang.is_some() {
            if script.is_some() && region.is_some() {
                push(Self::join(lang, script, region));
            }
            if region.is_some() {
                push(Self::join(lang, None, region));
            }
            if script.is_some() {
                push(Self::join(lang, script, None));
            }
            push(Self::join(lang, None, None));
        }
        if region.is_some() {
            push(Self::join(None, None, region));
        }
        push(ROOT_SPEC.to_string());

        chain
    }

    fn join(lang: Option<&str>, script: Option<&str>, region: Option<&str>) -> String {
        if lang.is_none() && script.is_none() && region.is_none() {
            return ROOT_SPEC.to_string();
        }

        let mut parts = vec![lang.unwrap_or(UNDETERMINED)];
        parts.extend(script);
        parts.extend(region);
        parts.join("-")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec())
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(&tag)
    }
}

impl Serialize for Locale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.spec())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::new(&tag))
    }
}
