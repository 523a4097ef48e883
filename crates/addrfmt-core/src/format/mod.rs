//! Rendering addresses as display text.

mod info;
pub mod template;

use std::sync::Arc;

use tracing::debug;

use crate::data::{ADDRESS_LABELS, COUNTRY_NAMES, LocaleStore, REGION_NAMES};
use crate::locale::{Locale, is_region_code};
use crate::models::address::Address;
use crate::models::ruleset::{ScriptFormat, TerritoryRuleset};
use crate::rules::generic;

pub use info::{Constraint, FormatComponent, FormatRow};

/// Style used when none is named.
pub const DEFAULT_STYLE: &str = "default";

/// Options for building an [`AddressFmt`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Locale whose territory's conventions apply; the store default if unset.
    pub locale: Option<Locale>,
    /// Template style; `default` if unset.
    pub style: Option<String>,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Formats addresses following a territory's conventions.
///
/// Addresses bound for another territory are rendered with that
/// territory's own layout.
#[derive(Debug, Clone)]
pub struct AddressFmt {
    store: Arc<LocaleStore>,
    locale: Locale,
    style: String,
    rules: Arc<TerritoryRuleset>,
}

impl AddressFmt {
    fn bind(store: &Arc<LocaleStore>, options: FormatOptions) -> (Locale, String) {
        let locale = options
            .locale
            .unwrap_or_else(|| store.default_locale().clone());
        let style = options.style.unwrap_or_else(|| DEFAULT_STYLE.to_string());
        (locale, style)
    }

    /// Create a formatter, blocking on locale data.
    pub fn new(store: Arc<LocaleStore>, options: FormatOptions) -> Self {
        let (locale, style) = Self::bind(&store, options);
        let rules = store.locale_rules_sync(&locale);
        Self {
            store,
            locale,
            style,
            rules,
        }
    }

    /// Create a formatter without blocking on locale data.
    pub async fn create(store: Arc<LocaleStore>, options: FormatOptions) -> Self {
        let (locale, style) = Self::bind(&store, options);
        let rules = store.locale_rules(&locale).await;
        Self {
            store,
            locale,
            style,
            rules,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Template for a script: the bound style, else the ruleset's default
    /// style, else the generic default.
    fn template(&self, script: ScriptFormat) -> String {
        self.rules
            .style(&self.style)
            .or_else(|| self.rules.style(DEFAULT_STYLE))
            .and_then(|style| style.get(script))
            .cloned()
            .or_else(|| {
                generic::ruleset()
                    .style(DEFAULT_STYLE)
                    .and_then(|style| style.get(script))
                    .cloned()
            })
            .unwrap_or_default()
    }

    /// Territory to hand the address to, if it is not ours.
    fn foreign_territory<'a>(&self, address: &'a Address) -> Option<&'a str> {
        let code = address.country_code.as_deref()?;
        let own = self.locale.region()?;
        (is_region_code(own) && !code.eq_ignore_ascii_case(own)).then_some(code)
    }

    fn delegate_options(&self, code: &str) -> FormatOptions {
        debug!("Formatting {} address with its own conventions", code);
        FormatOptions::new()
            .with_locale(Locale::for_region(code))
            .with_style(self.style.clone())
    }

    /// Format an address, blocking on locale data.
    pub fn format(&self, address: &Address) -> String {
        if let Some(code) = self.foreign_territory(address) {
            let other = AddressFmt::new(self.store.clone(), self.delegate_options(code));
            return other.format(address);
        }
        template::render(&self.template(address.format), address)
    }

    /// Format an address without blocking on locale data.
    pub async fn format_async(&self, address: &Address) -> String {
        if let Some(code) = self.foreign_territory(address) {
            let other = AddressFmt::create(self.store.clone(), self.delegate_options(code)).await;
            return Box::pin(other.format_async(address)).await;
        }
        template::render(&self.template(address.format), address)
    }

    /// Describe this formatter's template as rows of labelled form fields,
    /// with labels in `display`'s language (the formatter's own if unset).
    ///
    /// Returns `None` if any of the label, country or region datasets
    /// fails to load.
    pub async fn format_info(&self, display: Option<&Locale>) -> Option<Vec<FormatRow>> {
        let label_locale = match display {
            Some(display) => self.locale.with_language_of(display),
            None => self.locale.clone(),
        };

        let script = if self.rules.is_multiformat() && self.locale.is_asian() {
            ScriptFormat::Asian
        } else {
            ScriptFormat::Latin
        };

        let regions = self.store.resolve(REGION_NAMES, &label_locale).await.ok()?;
        let labels = self.store.resolve(ADDRESS_LABELS, &label_locale).await.ok()?;
        let countries = self.store.resolve(COUNTRY_NAMES, &label_locale).await.ok()?;
        let countries = self.store.compile_names(Ok(countries));

        let template = self.template(script);
        let sources = info::InfoSources {
            rules: &self.rules,
            script,
            template: &template,
            labels: labels.as_ref().map(|r| r.value.as_ref()),
            countries: countries.as_deref(),
            regions: regions.as_ref().map(|r| r.value.as_ref()),
            region: label_locale.region(),
        };
        Some(sources.rows())
    }
}

impl Address {
    /// Format with the shared embedded data.
    pub fn format_with(&self, locale: &str, style: Option<&str>) -> String {
        let mut options = FormatOptions::new().with_locale(locale);
        if let Some(style) = style {
            options = options.with_style(style);
        }
        AddressFmt::new(LocaleStore::shared(), options).format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::AddressField;
    use pretty_assertions::assert_eq;

    fn formatter(locale: &str) -> AddressFmt {
        AddressFmt::new(
            Arc::new(LocaleStore::embedded()),
            FormatOptions::new().with_locale(locale),
        )
    }

    fn albanian() -> Address {
        Address::default()
            .with(AddressField::StreetAddress, "Rr 'Aleksander Moisiu', P. 15, Sh. 1")
            .with(AddressField::Locality, "TIRANE")
            .with(AddressField::PostalCode, "1001")
            .with(AddressField::Country, "ALBANIA")
            .with(AddressField::CountryCode, "AL")
    }

    #[test]
    fn test_hybrid_uses_address_territory() {
        let out = formatter("en-US").format(&albanian());
        assert_eq!(out, "Rr 'Aleksander Moisiu', P. 15, Sh. 1\n1001-TIRANE\nALBANIA");
    }

    #[test]
    fn test_same_territory() {
        let address = Address::default()
            .with(AddressField::StreetAddress, "1 Main St")
            .with(AddressField::Locality, "Springfield")
            .with(AddressField::Region, "IL")
            .with(AddressField::PostalCode, "62701")
            .with(AddressField::CountryCode, "US");
        assert_eq!(formatter("en-US").format(&address), "1 Main St\nSpringfield IL 62701");
    }

    #[test]
    fn test_no_delegation_without_real_region() {
        // XX is not a territory, so the formatter keeps its own (generic) rules
        let out = formatter("en-XX").format(&albanian());
        assert_eq!(out, "Rr 'Aleksander Moisiu', P. 15, Sh. 1\nTIRANE 1001\nALBANIA");

        let fmt = formatter("en");
        assert_eq!(fmt.locale().region(), None);
        assert_eq!(fmt.format(&albanian()), "Rr 'Aleksander Moisiu', P. 15, Sh. 1\nTIRANE 1001\nALBANIA");
    }

    #[test]
    fn test_unknown_territory_without_country() {
        let fmt = AddressFmt::new(
            Arc::new(LocaleStore::embedded()),
            FormatOptions::new().with_locale("en-XX").with_style("nocountry"),
        );
        assert_eq!(fmt.format(&albanian()), "Rr 'Aleksander Moisiu', P. 15, Sh. 1\nTIRANE 1001");
    }

    #[test]
    fn test_missing_style_falls_back_to_default() {
        let store = Arc::new(LocaleStore::embedded());
        let fmt = AddressFmt::new(
            store,
            FormatOptions::new().with_locale("de-DE").with_style("fancy"),
        );
        assert_eq!(fmt.style(), "fancy");
        let address = Address::default()
            .with(AddressField::StreetAddress, "Hauptstraße 5")
            .with(AddressField::PostalCode, "10115")
            .with(AddressField::Locality, "Berlin")
            .with(AddressField::Country, "Deutschland")
            .with(AddressField::CountryCode, "DE");
        assert_eq!(fmt.format(&address), "Hauptstraße 5\n10115 Berlin\nDeutschland");
    }

    #[test]
    fn test_script_specific_ruleset() {
        use crate::data::{DirectoryData, EmbeddedData, LayeredData};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zh").join("Hant").join("HK");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(
            path.join("address.json"),
            r#"{"formats": {"default": "{locality} {streetAddress}"}}"#,
        )
        .unwrap();
        let layers = LayeredData::new()
            .with_layer(Arc::new(DirectoryData::new(dir.path())))
            .with_layer(Arc::new(EmbeddedData));
        let store = Arc::new(LocaleStore::new(Arc::new(layers)));

        let address = Address::default()
            .with(AddressField::StreetAddress, "1 Nathan Road")
            .with(AddressField::Locality, "Kowloon")
            .with(AddressField::CountryCode, "HK");

        let hant = AddressFmt::new(store.clone(), FormatOptions::new().with_locale("zh-Hant-HK"));
        assert_eq!(hant.format(&address), "Kowloon 1 Nathan Road");

        let english = AddressFmt::new(store, FormatOptions::new().with_locale("en-HK"));
        assert_ne!(english.format(&address), "Kowloon 1 Nathan Road");
    }

    #[test]
    fn test_empty_address() {
        assert_eq!(formatter("en-US").format(&Address::default()), "");
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let store = Arc::new(LocaleStore::embedded());
        let options = FormatOptions::new().with_locale("en-US");
        let fmt = AddressFmt::create(store.clone(), options.clone()).await;
        assert_eq!(fmt.format_async(&albanian()).await, AddressFmt::new(store, options).format(&albanian()));
    }
}
