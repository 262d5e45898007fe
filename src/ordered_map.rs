//! An insertion-ordered map used by the recipe planner.
//!
//! Several planner steps (enumerating elementary axes, assigning their
//! positions) depend on iteration order matching insertion order, which a
//! plain `hashbrown::HashMap` doesn't guarantee. Rather than pull in a
//! dedicated indexmap dependency, this keeps a parallel key vector
//! alongside the hash map, per the "insertion-ordered maps" design note.

use hashbrown::HashMap;
use std::borrow::Borrow;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    order: Vec<K>,
    values: HashMap<K, V>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key -> value`. If `key` is new, it's appended to the
    /// insertion order; if it already exists, its position is unchanged
    /// and the value is overwritten.
    pub fn insert(&mut self, key: K, value: V) {
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.values.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.values.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.values.contains_key(key)
    }

    /// Position of `key` in insertion order, if present.
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.order.iter().position(|k| k.borrow() == key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Values in insertion order.
    pub fn values_in_order(&self) -> impl Iterator<Item = &V> {
        self.order.iter().map(move |k| &self.values[k])
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(move |k| (k, &self.values[k]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut m = OrderedMap::new();
        m.insert("c", 1);
        m.insert("a", 2);
        m.insert("b", 3);
        let keys: Vec<_> = m.keys().copied().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(m.position(&"a"), Some(1));
    }

    #[test]
    fn reinsert_does_not_move_position() {
        let mut m = OrderedMap::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("a", 99);
        assert_eq!(m.position(&"a"), Some(0));
        assert_eq!(*m.get(&"a").unwrap(), 99);
    }
}
