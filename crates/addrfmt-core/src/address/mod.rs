//! Free-text address parsing.
//!
//! Parsing runs in three steps:
//! - the text is normalized into line fragments;
//! - the destination country is looked for at the start or the end, which
//!   picks the territory ruleset (the context locale's territory if none);
//! - the ruleset's field rules extract components in order, and whatever
//!   is left becomes the street address.

mod detect;
mod extract;
mod lines;
pub mod script;

use std::sync::Arc;

use tracing::debug;

use crate::data::{CountryNames, LocaleStore};
use crate::error::Result;
use crate::locale::Locale;
use crate::models::address::{Address, AddressField, AddressInput};
use crate::models::ruleset::{ScriptFormat, TerritoryRuleset};

pub use script::detect_script;

/// Fragments with the country already taken out.
struct Prepared {
    lines: Vec<String>,
    country: Option<String>,
    country_code: Option<String>,
}

impl Prepared {
    fn new(text: &str, tables: &[Arc<CountryNames>], locale: &Locale) -> Self {
        let mut lines = lines::split_fragments(text);

        match detect::find_country(&lines, tables) {
            Some(found) => {
                let country = found.text(&lines).to_string();
                debug!("Found country {:?} ({})", country, found.code);
                found.cut(&mut lines);
                Self {
                    lines,
                    country: Some(country),
                    country_code: Some(found.code),
                }
            }
            None => {
                debug!("No country named, assuming {:?}", locale.region());
                Self {
                    lines,
                    country: None,
                    country_code: locale.region().map(str::to_string),
                }
            }
        }
    }

    fn finish(mut self, rules: &TerritoryRuleset) -> Address {
        let script = if rules.is_multiformat() {
            detect_script(&self.lines)
        } else {
            ScriptFormat::Latin
        };

        let mut address = Address {
            format: script,
            ..Address::default()
        };
        address.set(AddressField::Country, self.country.take());
        address.set(AddressField::CountryCode, self.country_code.take());

        extract::apply_rules(
            &mut self.lines,
            rules.fields(script),
            rules.start_at(script),
            script,
            &mut address,
        );

        if !self.lines.is_empty() {
            let street = self.lines.join(rules.join_string(script));
            address.set(AddressField::StreetAddress, Some(street));
        }
        address
    }
}

/// Country code for a field object: the given one, else a lookup of the
/// country name, else the context territory.
fn resolve_fields(fields: &Address, tables: &[Arc<CountryNames>], locale: &Locale) -> Address {
    let mut address = fields.normalized();
    if address.country_code.is_none() {
        let by_name = address
            .country
            .as_deref()
            .and_then(|name| tables.iter().find_map(|t| t.code_for(name)))
            .or(locale.region())
            .map(str::to_string);
        address.set(AddressField::CountryCode, by_name);
    }
    address
}

/// Turns free text or field objects into [`Address`] values.
#[derive(Debug, Clone)]
pub struct AddressParser {
    store: Arc<LocaleStore>,
    locale: Option<Locale>,
}

impl AddressParser {
    /// Create a parser over `store`, using the store's default locale.
    pub fn new(store: Arc<LocaleStore>) -> Self {
        Self {
            store,
            locale: None,
        }
    }

    /// Set the context locale.
    pub fn with_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Context locale in effect.
    pub fn locale(&self) -> &Locale {
        self.locale.as_ref().unwrap_or_else(|| self.store.default_locale())
    }

    /// Parse, blocking on locale data. Never fails: text nothing matches
    /// ends up in the street address.
    pub fn parse(&self, input: impl Into<AddressInput>) -> Address {
        let locale = self.locale();
        match input.into() {
            AddressInput::Text(text) => {
                let tables = self.store.country_tables_sync(locale);
                let prepared = Prepared::new(&text, &tables, locale);
                let rules = self.store.rules_sync(prepared.country_code.as_deref());
                prepared.finish(&rules)
            }
            AddressInput::Fields(fields) => {
                let tables = self.field_tables_sync(&fields);
                resolve_fields(&fields, &tables, locale)
            }
        }
    }

    /// Parse without blocking on locale data.
    pub async fn parse_async(&self, input: impl Into<AddressInput>) -> Address {
        let locale = self.locale();
        match input.into() {
            AddressInput::Text(text) => {
                let tables = self.store.country_tables(locale).await;
                let prepared = Prepared::new(&text, &tables, locale);
                let rules = self.store.rules(prepared.country_code.as_deref()).await;
                prepared.finish(&rules)
            }
            AddressInput::Fields(fields) => {
                let tables = if needs_lookup(&fields) {
                    self.store.country_tables(locale).await
                } else {
                    Vec::new()
                };
                resolve_fields(&fields, &tables, locale)
            }
        }
    }

    /// Parse a dynamic JSON value: a string or an object of components.
    pub fn parse_value(&self, value: serde_json::Value) -> Result<Address> {
        Ok(self.parse(AddressInput::try_from(value)?))
    }

    fn field_tables_sync(&self, fields: &Address) -> Vec<Arc<CountryNames>> {
        if needs_lookup(fields) {
            self.store.country_tables_sync(self.locale())
        } else {
            Vec::new()
        }
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new(LocaleStore::shared())
    }
}

fn needs_lookup(fields: &Address) -> bool {
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
    blank(&fields.country_code) && !blank(&fields.country)
}

impl Address {
    /// Parse text or fields with the shared embedded data.
    pub fn parse(input: impl Into<AddressInput>, locale: &str) -> Address {
        AddressParser::default().with_locale(locale).parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AddrError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parser(locale: &str) -> AddressParser {
        AddressParser::new(Arc::new(LocaleStore::embedded())).with_locale(locale)
    }

    #[test]
    fn test_parse_albanian_address() {
        let address = parser("sq-AL").parse("Rr 'Aleksander Moisiu', P. 15, Sh. 1, 1001-TIRANE, ALBANIA");
        assert_eq!(
            address.street_address.as_deref(),
            Some("Rr 'Aleksander Moisiu', P. 15, Sh. 1")
        );
        assert_eq!(address.locality.as_deref(), Some("TIRANE"));
        assert_eq!(address.postal_code.as_deref(), Some("1001"));
        assert_eq!(address.country.as_deref(), Some("ALBANIA"));
        assert_eq!(address.country_code.as_deref(), Some("AL"));
        assert_eq!(address.region, None);
    }

    #[test]
    fn test_no_country_uses_context_territory() {
        let address = parser("de-DE").parse("Hauptstraße 5\n10115 Berlin");
        assert_eq!(address.country, None);
        assert_eq!(address.country_code.as_deref(), Some("DE"));
        assert_eq!(address.postal_code.as_deref(), Some("10115"));
        assert_eq!(address.locality.as_deref(), Some("Berlin"));
        assert_eq!(address.street_address.as_deref(), Some("Hauptstraße 5"));
    }

    #[test]
    fn test_empty_input() {
        let address = parser("en-US").parse("   \n , ");
        assert_eq!(address.street_address, None);
        assert_eq!(address.country_code.as_deref(), Some("US"));
    }

    #[test]
    fn test_fields_are_trimmed_and_resolved() {
        let fields = Address {
            street_address: Some(" 1 Main St ".to_string()),
            locality: Some("".to_string()),
            country: Some("Österreich".to_string()),
            ..Address::default()
        };
        let address = parser("en-US").parse(fields);
        assert_eq!(address.street_address.as_deref(), Some("1 Main St"));
        assert_eq!(address.locality, None);
        assert_eq!(address.country_code.as_deref(), Some("AT"));

        let address = parser("en-GB").parse(Address::default().with(AddressField::Locality, "Leeds"));
        assert_eq!(address.country_code.as_deref(), Some("GB"));
    }

    #[test]
    fn test_parse_value() {
        let p = parser("en-US");
        let address = p.parse_value(json!({"locality": "Tirana", "countryCode": "AL"})).unwrap();
        assert_eq!(address.country_code.as_deref(), Some("AL"));

        let err = p.parse_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, AddrError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let p = parser("en-US");
        let text = "Rr 'Aleksander Moisiu', P. 15, Sh. 1, 1001-TIRANE, ALBANIA";
        assert_eq!(p.parse_async(text).await, p.parse(text));
    }
}
