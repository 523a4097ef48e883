//! Locale-aware lookups with fallback, over the load-once cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;
use serde_json::Value;
use tracing::{debug, warn};

use super::cache::Loaded;
use super::names::{CountryNames, NATIVE_NAMES};
use super::{
    ADDRESS, COUNTRY_NAMES, DataCache, DirectoryData, EmbeddedData, LayeredData,
    LocaleDataProvider,
};
use crate::error::DataError;
use crate::locale::Locale;
use crate::models::config::AddrConfig;
use crate::models::ruleset::TerritoryRuleset;
use crate::rules::generic;

/// Data found for a locale, and the fallback level it came from.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub spec: String,
    pub value: Arc<Value>,
}

/// Outcome of walking a fallback chain.
pub type Resolution = Result<Option<Resolved>, Arc<DataError>>;

/// Fold one level of a chain walk. `Some` ends the walk.
fn step(basename: &str, spec: String, loaded: Loaded, last: &mut Option<Arc<DataError>>) -> Option<Resolution> {
    match loaded {
        Ok(Some(value)) => Some(Ok(Some(Resolved { spec, value }))),
        Ok(None) => None,
        Err(e) if e.is_pending() => Some(Err(e)),
        Err(e) => {
            warn!("Skipping {} for {}: {}", basename, spec, e);
            *last = Some(e);
            None
        }
    }
}

lazy_static! {
    static ref SHARED_STORE: Arc<LocaleStore> = Arc::new(LocaleStore::embedded());
}

/// Shared home of all locale data: the cache plus compiled artifacts.
///
/// Rulesets and country-name tables are compiled once per resolved spec.
pub struct LocaleStore {
    cache: DataCache,
    default_locale: Locale,
    rulesets: Mutex<HashMap<String, Arc<TerritoryRuleset>>>,
    names: Mutex<HashMap<String, Arc<CountryNames>>>,
}

impl LocaleStore {
    /// Create a store in front of `provider`, with `en-US` as the
    /// default locale.
    pub fn new(provider: Arc<dyn LocaleDataProvider>) -> Self {
        Self {
            cache: DataCache::new(provider),
            default_locale: Locale::new("en-US"),
            rulesets: Mutex::new(HashMap::new()),
            names: Mutex::new(HashMap::new()),
        }
    }

    /// A store serving only the embedded data.
    pub fn embedded() -> Self {
        Self::new(Arc::new(EmbeddedData))
    }

    /// Process-wide store over the embedded data.
    pub fn shared() -> Arc<Self> {
        SHARED_STORE.clone()
    }

    /// A store set up from configuration: data directories first, then
    /// the embedded data if enabled.
    pub fn from_config(config: &AddrConfig) -> Self {
        let mut layers = LayeredData::new();
        for dir in &config.data.data_dirs {
            layers = layers.with_layer(Arc::new(DirectoryData::new(dir)));
        }
        if config.data.use_embedded {
            layers = layers.with_layer(Arc::new(EmbeddedData));
        }
        debug!("Locale store with {} data layer(s)", layers.len());

        Self::new(Arc::new(layers)).with_default_locale(config.locale.default_locale.as_str())
    }

    /// Set the locale used when callers name none.
    pub fn with_default_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// The underlying load cache.
    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    /// Most specific data for `locale`, blocking.
    pub fn resolve_sync(&self, basename: &str, locale: &Locale) -> Resolution {
        let mut last = None;
        for spec in locale.fallback_chain() {
            let loaded = self.cache.get_sync(basename, &spec);
            if let Some(done) = step(basename, spec, loaded, &mut last) {
                return done;
            }
        }
        last.map_or(Ok(None), Err)
    }

    /// Most specific data for `locale`.
    pub async fn resolve(&self, basename: &str, locale: &Locale) -> Resolution {
        let mut last = None;
        for spec in locale.fallback_chain() {
            let loaded = self.cache.get(basename, &spec).await;
            if let Some(done) = step(basename, spec, loaded, &mut last) {
                return done;
            }
        }
        last.map_or(Ok(None), Err)
    }

    /// Ruleset governing `country_code`, blocking. Never fails: anything
    /// short of usable data yields the generic default.
    pub fn rules_sync(&self, country_code: Option<&str>) -> Arc<TerritoryRuleset> {
        match country_code {
            Some(code) => {
                let resolution = self.resolve_sync(ADDRESS, &Locale::for_region(code));
                self.compile_rules(code, resolution)
            }
            None => generic::ruleset(),
        }
    }

    /// Ruleset governing `country_code`.
    pub async fn rules(&self, country_code: Option<&str>) -> Arc<TerritoryRuleset> {
        match country_code {
            Some(code) => {
                let resolution = self.resolve(ADDRESS, &Locale::for_region(code)).await;
                self.compile_rules(code, resolution)
            }
            None => generic::ruleset(),
        }
    }

    /// Ruleset bound to `locale`, blocking. Walks the whole fallback
    /// chain, so language and script specific rulesets win over the
    /// territory's own.
    pub fn locale_rules_sync(&self, locale: &Locale) -> Arc<TerritoryRuleset> {
        let resolution = self.resolve_sync(ADDRESS, locale);
        self.compile_rules(&locale.spec(), resolution)
    }

    /// Ruleset bound to `locale`.
    pub async fn locale_rules(&self, locale: &Locale) -> Arc<TerritoryRuleset> {
        let resolution = self.resolve(ADDRESS, locale).await;
        self.compile_rules(&locale.spec(), resolution)
    }

    fn compile_rules(&self, code: &str, resolution: Resolution) -> Arc<TerritoryRuleset> {
        let resolved = match resolution {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                debug!("No address data for {}, using the generic default", code);
                return generic::ruleset();
            }
            Err(e) => {
                if e.is_pending() {
                    debug!("{}", e);
                } else {
                    warn!("Address data for {} unavailable: {}", code, e);
                }
                return generic::ruleset();
            }
        };

        let mut rulesets = self.rulesets.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rules) = rulesets.get(&resolved.spec) {
            return rules.clone();
        }

        let rules = match TerritoryRuleset::from_value(&resolved.spec, &resolved.value) {
            Ok(rules) => {
                debug!("Compiled address rules for {}", resolved.spec);
                Arc::new(rules)
            }
            Err(e) => {
                warn!("Unusable address data for {}, using the generic default: {}", resolved.spec, e);
                generic::ruleset()
            }
        };
        rulesets.insert(resolved.spec, rules.clone());
        rules
    }

    pub(crate) fn compile_names(&self, resolution: Resolution) -> Option<Arc<CountryNames>> {
        let resolved = match resolution {
            Ok(Some(resolved)) => resolved,
            Ok(None) => return None,
            Err(e) => {
                debug!("Country names unavailable: {}", e);
                return None;
            }
        };

        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = names.get(&resolved.spec) {
            return Some(table.clone());
        }

        match CountryNames::from_value(&resolved.spec, &resolved.value) {
            Ok(table) => {
                let table = Arc::new(table);
                names.insert(resolved.spec, table.clone());
                Some(table)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Country names in `locale`'s language, blocking.
    pub fn country_names_sync(&self, locale: &Locale) -> Option<Arc<CountryNames>> {
        self.compile_names(self.resolve_sync(COUNTRY_NAMES, locale))
    }

    /// Country names in `locale`'s language.
    pub async fn country_names(&self, locale: &Locale) -> Option<Arc<CountryNames>> {
        let resolution = self.resolve(COUNTRY_NAMES, locale).await;
        self.compile_names(resolution)
    }

    /// Tables consulted for country detection, in order: `locale`'s
    /// language, native names, English. Blocking.
    pub fn country_tables_sync(&self, locale: &Locale) -> Vec<Arc<CountryNames>> {
        let localized = self.country_names_sync(locale);
        let english = self.country_names_sync(&Locale::new("en"));
        Self::tables(localized, english)
    }

    /// Tables consulted for country detection.
    pub async fn country_tables(&self, locale: &Locale) -> Vec<Arc<CountryNames>> {
        let localized = self.country_names(locale).await;
        let english = self.country_names(&Locale::new("en")).await;
        Self::tables(localized, english)
    }

    fn tables(
        localized: Option<Arc<CountryNames>>,
        english: Option<Arc<CountryNames>>,
    ) -> Vec<Arc<CountryNames>> {
        let mut tables = Vec::with_capacity(3);
        tables.extend(localized.clone());
        tables.push(NATIVE_NAMES.clone());
        if let Some(english) = english {
            let duplicate = localized.is_some_and(|l| Arc::ptr_eq(&l, &english));
            if !duplicate {
                tables.push(english);
            }
        }
        tables
    }
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::embedded()
    }
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("default_locale", &self.default_locale)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadResult;
    use crate::models::ruleset::ScriptFormat;
    use serde_json::json;

    /// Only `und-QQ` fails; everything else is absent.
    struct Flaky;

    impl LocaleDataProvider for Flaky {
        fn load_sync(&self, basename: &str, spec: &str) -> LoadResult {
            match spec {
                "und-QQ" => Err(DataError::malformed(basename, spec, "flaky")),
                "root" => Ok(Some(json!({"formats": {"default": "{locality}"}}))),
                _ => Ok(None),
            }
        }
    }

    #[test]
    fn test_resolve_walks_chain() {
        let store = LocaleStore::embedded();
        let resolved = store
            .resolve_sync(COUNTRY_NAMES, &Locale::new("de-AT"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.spec, "de");

        let missing = store.resolve_sync(ADDRESS, &Locale::for_region("XX")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_failing_level_is_skipped() {
        let store = LocaleStore::new(Arc::new(Flaky));
        let resolved = store
            .resolve_sync(ADDRESS, &Locale::for_region("QQ"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.spec, "root");
    }

    #[test]
    fn test_unknown_territory_gets_generic_rules() {
        let store = LocaleStore::embedded();
        let rules = store.rules_sync(Some("XX"));
        assert!(Arc::ptr_eq(&rules, &generic::ruleset()));
        assert!(Arc::ptr_eq(&store.rules_sync(None), &generic::ruleset()));
    }

    #[test]
    fn test_rules_compiled_once() {
        let store = LocaleStore::embedded();
        let first = store.rules_sync(Some("US"));
        let second = store.rules_sync(Some("US"));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.fields(ScriptFormat::Latin).is_empty());
        assert_eq!(store.cache().load_count(), 1);
    }

    #[test]
    fn test_country_tables() {
        let store = LocaleStore::embedded();
        let tables = store.country_tables_sync(&Locale::new("de-DE"));
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].code_for("Österreich"), Some("AT"));

        // English context: no duplicate English table
        let tables = store.country_tables_sync(&Locale::new("en-GB"));
        assert_eq!(tables.len(), 2);

        // no names for the context language at all
        let tables = store.country_tables_sync(&Locale::new("xx"));
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("und").join("QQ");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(
            path.join("address.json"),
            r#"{"formats": {"default": "{postalCode} {locality}"}}"#,
        )
        .unwrap();

        let mut config = AddrConfig::default();
        config.locale.default_locale = "de-DE".to_string();
        config.data.data_dirs.push(dir.path().to_path_buf());

        let store = LocaleStore::from_config(&config);
        assert_eq!(store.default_locale().spec(), "de-DE");
        assert!(store.rules_sync(Some("QQ")).style("default").is_some());
        assert!(!Arc::ptr_eq(&store.rules_sync(Some("QQ")), &generic::ruleset()));
        // embedded data is still behind the directory
        assert!(!Arc::ptr_eq(&store.rules_sync(Some("US")), &generic::ruleset()));
    }

    #[test]
    fn test_locale_rules_prefer_most_specific() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zh").join("Hant").join("HK");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(
            path.join("address.json"),
            r#"{"formats": {"default": "{region}{locality}{streetAddress}"}}"#,
        )
        .unwrap();

        let layers = LayeredData::new()
            .with_layer(Arc::new(DirectoryData::new(dir.path())))
            .with_layer(Arc::new(EmbeddedData));
        let store = LocaleStore::new(Arc::new(layers));

        let hant = store.locale_rules_sync(&Locale::new("zh-Hant-HK"));
        let territory = store.rules_sync(Some("HK"));
        assert!(!Arc::ptr_eq(&hant, &territory));
        assert!(!hant.is_multiformat());

        // other languages in the territory fall through to und-HK
        let english = store.locale_rules_sync(&Locale::new("en-HK"));
        assert!(Arc::ptr_eq(&english, &territory));

        // no region and no language data: the generic default
        let bare = store.locale_rules_sync(&Locale::new("en"));
        assert!(Arc::ptr_eq(&bare, &generic::ruleset()));
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let store = LocaleStore::embedded();
        let rules = store.rules(Some("DE")).await;
        assert!(Arc::ptr_eq(&rules, &store.rules_sync(Some("DE"))));

        let tables = store.country_tables(&Locale::new("fr-FR")).await;
        assert_eq!(tables.len(), 3);
    }
}
