//! The structured address record and the inputs it is built from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AddrError;
use crate::models::ruleset::ScriptFormat;

/// A component of a postal address that rules can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    StreetAddress,
    Locality,
    Region,
    PostalCode,
    PostOffice,
    Country,
    CountryCode,
}

impl AddressField {
    /// All fields, in template order.
    pub const ALL: [AddressField; 7] = [
        Self::StreetAddress,
        Self::Locality,
        Self::Region,
        Self::PostalCode,
        Self::PostOffice,
        Self::Country,
        Self::CountryCode,
    ];

    /// Name used in templates and data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StreetAddress => "streetAddress",
            Self::Locality => "locality",
            Self::Region => "region",
            Self::PostalCode => "postalCode",
            Self::PostOffice => "postOffice",
            Self::Country => "country",
            Self::CountryCode => "countryCode",
        }
    }

    /// Look a field up by its template name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A postal address split into its components.
///
/// Every component is optional; absent and empty are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_office: Option<String>,

    /// Country name as written in the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// ISO 3166-1 alpha-2 code the address is interpreted under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// Script the address was written in.
    #[serde(default)]
    pub format: ScriptFormat,
}

impl Address {
    /// Value of a component.
    pub fn get(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::StreetAddress => self.street_address.as_deref(),
            AddressField::Locality => self.locality.as_deref(),
            AddressField::Region => self.region.as_deref(),
            AddressField::PostalCode => self.postal_code.as_deref(),
            AddressField::PostOffice => self.post_office.as_deref(),
            AddressField::Country => self.country.as_deref(),
            AddressField::CountryCode => self.country_code.as_deref(),
        }
    }

    /// Value of a component named as in a template.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        AddressField::from_name(name).and_then(|f| self.get(f))
    }

    /// Set a component. Blank values clear it.
    pub fn set(&mut self, field: AddressField, value: Option<String>) {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let slot = match field {
            AddressField::StreetAddress => &mut self.street_address,
            AddressField::Locality => &mut self.locality,
            AddressField::Region => &mut self.region,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::PostOffice => &mut self.post_office,
            AddressField::Country => &mut self.country,
            AddressField::CountryCode => &mut self.country_code,
        };
        *slot = value;
    }

    /// Set a component (builder style).
    pub fn with(mut self, field: AddressField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Copy with every component trimmed and blank components cleared.
    pub fn normalized(&self) -> Self {
        let mut out = Self {
            format: self.format,
            ..Self::default()
        };
        for field in AddressField::ALL {
            out.set(field, self.get(field).map(str::to_string));
        }
        out
    }

    /// Whether no component carries a value.
    pub fn is_empty(&self) -> bool {
        AddressField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// What an [`Address`] can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressInput {
    /// A free-form address, lines separated by newlines or commas.
    Text(String),
    /// Already separated components.
    Fields(Address),
}

impl From<&str> for AddressInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Address> for AddressInput {
    fn from(address: Address) -> Self {
        Self::Fields(address)
    }
}

impl From<&Address> for AddressInput {
    fn from(address: &Address) -> Self {
        Self::Fields(address.clone())
    }
}

impl TryFrom<serde_json::Value> for AddressInput {
    type Error = AddrError;

    /// Accept a JSON string or a JSON object of components.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(text) => Ok(Self::Text(text)),
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(Self::Fields)
                .map_err(|e| AddrError::InvalidArgument(format!("bad address fields: {e}"))),
            other => Err(AddrError::InvalidArgument(format!(
                "expected a string or an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_field_names() {
        for field in AddressField::ALL {
            assert_eq!(AddressField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(AddressField::from_name("nothing"), None);
    }

    #[test]
    fn test_set_clears_blank_values() {
        let mut address = Address::default().with(AddressField::Locality, "  Berlin ");
        assert_eq!(address.locality.as_deref(), Some("Berlin"));

        address.set(AddressField::Locality, Some("   ".to_string()));
        assert_eq!(address.locality, None);
        assert!(address.is_empty());
    }

    #[test]
    fn test_serializes_camel_case_without_absent_fields() {
        let address = Address::default()
            .with(AddressField::PostalCode, "10115")
            .with(AddressField::CountryCode, "DE");

        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(
            value,
            json!({"postalCode": "10115", "countryCode": "DE", "format": "latin"})
        );
    }

    #[test]
    fn test_input_from_json() {
        let text = AddressInput::try_from(json!("1 Main St")).unwrap();
        assert_eq!(text, AddressInput::Text("1 Main St".to_string()));

        let fields = AddressInput::try_from(json!({"locality": "Tirana", "extra": 1})).unwrap();
        match fields {
            AddressInput::Fields(address) => assert_eq!(address.locality.as_deref(), Some("Tirana")),
            other => panic!("unexpected input {other:?}"),
        }
    }

    #[test]
    fn test_input_rejects_other_json() {
        let err = AddressInput::try_from(json!(42)).unwrap_err();
        assert!(matches!(err, AddrError::InvalidArgument(_)));

        let err = AddressInput::try_from(json!({"locality": 7})).unwrap_err();
        assert!(matches!(err, AddrError::InvalidArgument(_)));
    }
}
