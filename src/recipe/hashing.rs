//! Stable hashing of planner/specializer cache keys.
//!
//! Uses `std`'s `SipHash`-based `DefaultHasher` rather than a bespoke
//! combinator; the cache keys are short-lived process-local lookups, not
//! persisted or cross-version data, so `DefaultHasher`'s lack of a
//! cross-release stability guarantee doesn't matter here.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hashes the recipe-planning inputs: pattern text, operation name, the
/// caller's `axis_lengths` (in call order — this mirrors the order
/// sensitivity of the reference implementation, which hashes the supplied
/// sequence positionally rather than after sorting), and tensor rank.
pub fn recipe_cache_key(pattern: &str, operation: &str, axis_lengths: &[(&str, i64)], ndim: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    pattern.hash(&mut hasher);
    operation.hash(&mut hasher);
    for (name, value) in axis_lengths {
        name.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    ndim.hash(&mut hasher);
    hasher.finish()
}

/// Hashes the shape-specialization inputs: the owning recipe's hash, the
/// concrete shape, and the caller's `axis_lengths`.
pub fn cooked_cache_key(recipe_hash: u64, shape: &[i64], axis_lengths: &[(&str, i64)]) -> u64 {
    let mut hasher = DefaultHasher::new();
    recipe_hash.hash(&mut hasher);
    shape.hash(&mut hasher);
    for (name, value) in axis_lengths {
        name.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    hasher.finish()
}
