//! Locale data: providers, the resolution cache and the store on top.
//!
//! A [`LocaleDataProvider`] fetches one JSON dataset for one exact locale
//! spec. [`DataCache`] makes sure each `(basename, spec)` pair is fetched
//! at most once, and [`LocaleStore`] walks locale fallback chains over
//! the cache and compiles what it finds.

mod cache;
mod directory;
mod names;
mod store;

use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use tracing::warn;

use crate::error::DataError;
use crate::models::embedded;

pub use cache::DataCache;
pub use directory::DirectoryData;
pub use names::{CodeName, CountryNames};
pub use store::{LocaleStore, Resolution, Resolved};

/// Territory rulesets.
pub const ADDRESS: &str = "address";
/// Country display names, name to code.
pub const COUNTRY_NAMES: &str = "ctrynames";
/// Region choices per territory.
pub const REGION_NAMES: &str = "regionnames";
/// Translated field labels.
pub const ADDRESS_LABELS: &str = "addressres";

/// Outcome of loading one dataset at one level: `Ok(None)` means there is
/// simply nothing at this level.
pub type LoadResult = Result<Option<Value>, DataError>;

/// Source of raw locale data.
pub trait LocaleDataProvider: Send + Sync {
    /// Load a dataset, blocking.
    fn load_sync(&self, basename: &str, spec: &str) -> LoadResult;

    /// Load a dataset without blocking.
    fn load(&self, basename: &str, spec: &str) -> BoxFuture<'static, LoadResult> {
        future::ready(self.load_sync(basename, spec)).boxed()
    }
}

/// Data compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedData;

impl LocaleDataProvider for EmbeddedData {
    fn load_sync(&self, basename: &str, spec: &str) -> LoadResult {
        embedded::embedded_file(basename, spec)
            .map(|text| {
                serde_json::from_str(text).map_err(|e| DataError::malformed(basename, spec, e))
            })
            .transpose()
    }
}

/// Several providers stacked: the first one with data wins.
#[derive(Clone, Default)]
pub struct LayeredData {
    layers: Vec<Arc<dyn LocaleDataProvider>>,
}

impl LayeredData {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider below the existing ones.
    pub fn with_layer(mut self, layer: Arc<dyn LocaleDataProvider>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether there is no provider at all.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Fold one layer's outcome into the running result. Returns the data
/// once a layer yields some.
fn settle_layer(
    basename: &str,
    spec: &str,
    loaded: LoadResult,
    failure: &mut Option<DataError>,
) -> Option<Value> {
    match loaded {
        Ok(found) => found,
        Err(e) => {
            warn!("Data layer failed for {} {}: {}", basename, spec, e);
            failure.get_or_insert(e);
            None
        }
    }
}

impl LocaleDataProvider for LayeredData {
    fn load_sync(&self, basename: &str, spec: &str) -> LoadResult {
        let mut failure = None;
        for layer in &self.layers {
            if let Some(value) = settle_layer(basename, spec, layer.load_sync(basename, spec), &mut failure) {
                return Ok(Some(value));
            }
        }
        failure.map_or(Ok(None), Err)
    }

    fn load(&self, basename: &str, spec: &str) -> BoxFuture<'static, LoadResult> {
        let layers = self.layers.clone();
        let basename = basename.to_string();
        let spec = spec.to_string();

        async move {
            let mut failure = None;
            for layer in layers {
                let loaded = layer.load(&basename, &spec).await;
                if let Some(value) = settle_layer(&basename, &spec, loaded, &mut failure) {
                    return Ok(Some(value));
                }
            }
            failure.map_or(Ok(None), Err)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Value);

    impl LocaleDataProvider for Fixed {
        fn load_sync(&self, basename: &str, _spec: &str) -> LoadResult {
            Ok((basename == ADDRESS).then(|| self.0.clone()))
        }
    }

    struct Broken;

    impl LocaleDataProvider for Broken {
        fn load_sync(&self, basename: &str, spec: &str) -> LoadResult {
            Err(DataError::malformed(basename, spec, "broken"))
        }
    }

    #[test]
    fn test_embedded_data() {
        let value = EmbeddedData.load_sync(ADDRESS, "und-US").unwrap().unwrap();
        assert!(value.get("formats").is_some());
        assert!(EmbeddedData.load_sync(ADDRESS, "und-XX").unwrap().is_none());
    }

    #[test]
    fn test_layers_first_wins() {
        let layered = LayeredData::new()
            .with_layer(Arc::new(Fixed(json!({"layer": 1}))))
            .with_layer(Arc::new(Fixed(json!({"layer": 2}))));

        assert_eq!(layered.load_sync(ADDRESS, "und-US").unwrap(), Some(json!({"layer": 1})));
        assert_eq!(layered.load_sync(COUNTRY_NAMES, "en").unwrap(), None);
    }

    #[test]
    fn test_layers_skip_failures() {
        let layered = LayeredData::new()
            .with_layer(Arc::new(Broken))
            .with_layer(Arc::new(Fixed(json!({"layer": 2}))));
        assert_eq!(layered.load_sync(ADDRESS, "und-US").unwrap(), Some(json!({"layer": 2})));

        // nothing found anywhere: the failure is reported
        assert!(layered.load_sync(COUNTRY_NAMES, "en").is_err());
    }

    #[tokio::test]
    async fn test_layers_async() {
        let layered = LayeredData::new()
            .with_layer(Arc::new(Broken))
            .with_layer(Arc::new(EmbeddedData));
        let value = layered.load(ADDRESS, "und-DE").await.unwrap();
        assert!(value.is_some());
    }
}
