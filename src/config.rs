//! Cache-sizing configuration for the process-wide LRU caches.
//!
//! Supplements spec.md's "expose a knob to bound or flush them" design
//! note: an embedder running this crate inside a long-lived service can
//! override the default capacities once, before the caches are first
//! touched, via [`CacheConfig::set_global`].

use std::sync::OnceLock;

use crate::cache::{DEFAULT_COOKED_CACHE_CAPACITY, DEFAULT_RECIPE_CACHE_CAPACITY};

/// Capacities for the recipe and cooked-recipe caches.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub recipe_capacity: usize,
    pub cooked_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            recipe_capacity: DEFAULT_RECIPE_CACHE_CAPACITY,
            cooked_capacity: DEFAULT_COOKED_CACHE_CAPACITY,
        }
    }
}

static GLOBAL_CONFIG: OnceLock<CacheConfig> = OnceLock::new();

impl CacheConfig {
    /// The effective global configuration: whatever was set via
    /// [`Self::set_global`], or [`Self::default`] if nothing was.
    pub fn global() -> CacheConfig {
        *GLOBAL_CONFIG.get_or_init(CacheConfig::default)
    }

    /// Overrides the global cache capacities. Must be called before the
    /// first `rearrange`/`repeat`/`reduce`/`einsum` call in the process —
    /// once the caches are initialized, their capacity is fixed for the
    /// process's lifetime. Returns `Err(())` with the already-active
    /// configuration if the caches were already initialized.
    pub fn set_global(config: CacheConfig) -> Result<(), CacheConfig> {
        GLOBAL_CONFIG.set(config).map_err(|_| CacheConfig::global())
    }
}
