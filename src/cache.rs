//! C6: the fixed-capacity LRU caches in front of the recipe planner and
//! shape specializer.
//!
//! Two process-wide instances back the public API in [`crate::ops`]:
//! a recipe cache (capacity 256) and a cooked-recipe cache (capacity
//! 1024), per spec. Each is an `lru::LruCache` behind its own `Mutex`,
//! locked only for the lookup/insert itself — planner and specializer work
//! both run outside the critical section.

use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use lru::LruCache;

use crate::config::CacheConfig;
use crate::cook::CookedRecipe;
use crate::recipe::TransformRecipe;

/// A thread-safe, fixed-capacity cache from a 64-bit hash to `V`.
pub struct Cache<V> {
    inner: Mutex<LruCache<u64, V>>,
}

impl<V: Clone> Cache<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up `key`, marking it most-recently-used on a hit.
    pub fn get(&self, key: u64) -> Option<V> {
        self.inner.lock().unwrap().get(&key).cloned()
    }

    /// Inserts `key -> value`, evicting the least-recently-used entry if
    /// the cache is at capacity.
    pub fn put(&self, key: u64, value: V) {
        self.inner.lock().unwrap().put(key, value);
    }

    /// True if `key` is present, without affecting recency order.
    pub fn contains(&self, key: u64) -> bool {
        self.inner.lock().unwrap().contains(&key)
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default recipe-cache capacity (spec: 256).
pub const DEFAULT_RECIPE_CACHE_CAPACITY: usize = 256;
/// Default cooked-recipe-cache capacity (spec: 1024).
pub const DEFAULT_COOKED_CACHE_CAPACITY: usize = 1024;

static RECIPE_CACHE: OnceLock<Cache<TransformRecipe>> = OnceLock::new();
static COOKED_CACHE: OnceLock<Cache<CookedRecipe>> = OnceLock::new();

/// The process-wide recipe cache, sized per [`CacheConfig::global()`].
pub fn recipe_cache() -> &'static Cache<TransformRecipe> {
    RECIPE_CACHE.get_or_init(|| Cache::with_capacity(CacheConfig::global().recipe_capacity))
}

/// The process-wide cooked-recipe cache, sized per [`CacheConfig::global()`].
pub fn cooked_cache() -> &'static Cache<CookedRecipe> {
    COOKED_CACHE.get_or_init(|| Cache::with_capacity(CacheConfig::global().cooked_capacity))
}

/// Flushes both process-wide caches. Safe to call at any time; callers in
/// flight simply repopulate on their next miss.
pub fn clear_global_caches() {
    recipe_cache().clear();
    cooked_cache().clear();
}
