//! Single-slot derived-value cache
//!
//! A [`Memo`] holds the last value computed for a key. Asking again with an
//! equal key hands back the same `Arc`, so painters can compare layers with
//! `Arc::ptr_eq` instead of diffing them.

use std::sync::Arc;

pub struct Memo<K, V: ?Sized> {
    slot: Option<(K, Arc<V>)>,
    computes: u64,
}

impl<K, V: ?Sized> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None, computes: 0 }
    }
}

impl<K: PartialEq, V: ?Sized> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, computing it on a miss
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> Arc<V>) -> Arc<V> {
        if let Some((cached_key, value)) = &self.slot {
            if *cached_key == key {
                return Arc::clone(value);
            }
        }
        let value = compute();
        self.computes += 1;
        self.slot = Some((key, Arc::clone(&value)));
        value
    }

    /// Number of misses so far
    pub fn computes(&self) -> u64 {
        self.computes
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}
