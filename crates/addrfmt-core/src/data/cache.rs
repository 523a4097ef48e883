//! Load-once cache over a locale data provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tracing::{trace, warn};

use super::{LoadResult, LocaleDataProvider};
use crate::error::DataError;

/// A settled load, cheap to clone: data, nothing, or the failure.
pub type Loaded = Result<Option<Arc<Value>>, Arc<DataError>>;

type Key = (String, String);

enum Slot {
    Ready(Loaded),
    Loading(Shared<BoxFuture<'static, Loaded>>),
}

/// Caches provider results per `(basename, spec)`.
///
/// Each key is fetched at most once. Concurrent async requests for a key
/// that is still loading await the same shared future. Failures are cached
/// like successes.
pub struct DataCache {
    provider: Arc<dyn LocaleDataProvider>,
    slots: Mutex<HashMap<Key, Slot>>,
    loads: AtomicUsize,
}

impl DataCache {
    /// Create an empty cache in front of `provider`.
    pub fn new(provider: Arc<dyn LocaleDataProvider>) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Key, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(basename: &str, spec: &str, loaded: LoadResult) -> Loaded {
        match loaded {
            Ok(value) => Ok(value.map(Arc::new)),
            Err(e) => {
                warn!("Failed to load {} for {}: {}", basename, spec, e);
                Err(Arc::new(e))
            }
        }
    }

    /// Blocking lookup.
    ///
    /// Never waits on an asynchronous load that is still running: such a
    /// key yields [`DataError::Pending`] and no second load is issued.
    pub fn get_sync(&self, basename: &str, spec: &str) -> Loaded {
        let key = (basename.to_string(), spec.to_string());
        let mut slots = self.lock();

        match slots.get(&key) {
            Some(Slot::Ready(loaded)) => {
                trace!("Cache hit: {} {}", basename, spec);
                return loaded.clone();
            }
            Some(Slot::Loading(pending)) => {
                return match pending.clone().now_or_never() {
                    Some(loaded) => {
                        slots.insert(key, Slot::Ready(loaded.clone()));
                        loaded
                    }
                    None => Err(Arc::new(DataError::Pending {
                        basename: basename.to_string(),
                        locale: spec.to_string(),
                    })),
                };
            }
            None => {}
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        trace!("Loading {} {}", basename, spec);
        let loaded = Self::settle(basename, spec, self.provider.load_sync(basename, spec));
        slots.insert(key, Slot::Ready(loaded.clone()));
        loaded
    }

    /// Non-blocking lookup.
    pub async fn get(&self, basename: &str, spec: &str) -> Loaded {
        let key = (basename.to_string(), spec.to_string());

        let pending = {
            let mut slots = self.lock();
            match slots.get(&key) {
                Some(Slot::Ready(loaded)) => {
                    trace!("Cache hit: {} {}", basename, spec);
                    return loaded.clone();
                }
                Some(Slot::Loading(pending)) => {
                    trace!("Joining in-flight load: {} {}", basename, spec);
                    pending.clone()
                }
                None => {
                    self.loads.fetch_add(1, Ordering::Relaxed);
                    trace!("Loading {} {}", basename, spec);
                    let (b, s) = key.clone();
                    let pending = self
                        .provider
                        .load(basename, spec)
                        .map(move |loaded| Self::settle(&b, &s, loaded))
                        .boxed()
                        .shared();
                    slots.insert(key.clone(), Slot::Loading(pending.clone()));
                    pending
                }
            }
        };

        let loaded = pending.await;

        let mut slots = self.lock();
        if matches!(slots.get(&key), Some(Slot::Loading(_))) {
            slots.insert(key, Slot::Ready(loaded.clone()));
        }
        loaded
    }

    /// Number of provider loads issued so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of cached keys, settled or in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every cached key.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl std::fmt::Debug for DataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCache")
            .field("len", &self.len())
            .field("loads", &self.load_count())
            .finish()
    }
}
