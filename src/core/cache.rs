//! Process-wide model cache.
//!
//! Loading a classifier means downloading weights and building tensors, so a
//! model is loaded at most once per process and shared read-only afterwards.
//! Every entry is a single-flight slot: concurrent first callers for the same
//! key block on the slot while one of them runs the loader.

use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Trait implemented by model option types to generate a stable cache key.
pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

type Slot<M> = OnceCell<Arc<M>>;

type CacheStorage = HashMap<(TypeId, String), Arc<dyn Any + Send + Sync>>;

/// A thread-safe cache of loaded models keyed by model type and a string key.
pub struct ModelCache {
    slots: Mutex<CacheStorage>,
}

impl ModelCache {
    /// Create a new empty model cache.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get the model for `key`, running `loader` if it has not been loaded yet.
    ///
    /// Only one loader runs per key. Callers arriving while it runs wait for
    /// its result. If the loader fails the slot stays empty, the error goes
    /// to the caller that ran it and the next call tries again.
    pub fn get_or_create<M, E, F>(&self, key: &str, loader: F) -> Result<Arc<M>, E>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M, E>,
    {
        let slot = self.slot::<M>(key);
        slot.get_or_try_init(|| loader().map(Arc::new)).cloned()
    }

    /// Returns the model for `key` if it is already loaded.
    pub fn get<M>(&self, key: &str) -> Option<Arc<M>>
    where
        M: Send + Sync + 'static,
    {
        let slots = self.lock();
        slots
            .get(&(TypeId::of::<M>(), key.to_string()))
            .and_then(|slot| slot.downcast_ref::<Slot<M>>())
            .and_then(|slot| slot.get().cloned())
    }

    fn slot<M>(&self, key: &str) -> Arc<Slot<M>>
    where
        M: Send + Sync + 'static,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());
        let mut slots = self.lock();
        let entry = slots
            .entry(cache_key)
            .or_insert_with(|| Arc::new(Slot::<M>::new()) as Arc<dyn Any + Send + Sync>)
            .clone();
        // The TypeId in the key guarantees the downcast.
        match entry.downcast::<Slot<M>>() {
            Ok(slot) => slot,
            Err(_) => Arc::new(Slot::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheStorage> {
        // A poisoned map is still structurally valid; slots guard their own state.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop every cached model. Pipelines holding an `Arc` keep theirs alive.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of keys that have been requested, loaded or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

/// Get a reference to the global model cache.
pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}
