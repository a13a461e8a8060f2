/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the [KVStore] trait, which specifies the interface of the store that holds the keys a node
//! replicates, and [MemStore], a simple, volatile, in-memory implementation of it.
//!
//! A store is only ever touched from within its node's tick, so implementations need no internal
//! locking.

use std::collections::BTreeMap;

/// The local store of a node. Every operation reports whether it took effect instead of returning an
/// error: a failed operation is an ordinary outcome that is sent back to the coordinator in a reply.
pub trait KVStore: Send + 'static {
    /// Insert `key`. Fails if `key` is already present.
    fn create(&mut self, key: &str, value: &str) -> bool;

    /// Get the value of `key`, if present.
    fn read(&self, key: &str) -> Option<String>;

    /// Overwrite the value of `key`. Fails if `key` is absent.
    fn update(&mut self, key: &str, value: &str) -> bool;

    /// Remove `key`. Fails if `key` is absent.
    fn delete(&mut self, key: &str) -> bool;

    /// A snapshot of every key-value pair in the store.
    fn entries(&self) -> Vec<(String, String)>;

    fn len(&self) -> usize;

    fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory implementation of [KVStore]. Entries are kept in key order, so [entries](KVStore::entries)
/// is deterministic.
#[derive(Clone, Debug, Default)]
pub struct MemStore(BTreeMap<String, String>);

impl MemStore {
    /// Create a new, empty `MemStore`.
    pub fn new() -> MemStore {
        MemStore(BTreeMap::new())
    }
}

impl KVStore for MemStore {
    fn create(&mut self, key: &str, value: &str) -> bool {
        if self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_string(), value.to_string());
        true
    }

    fn read(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: &str) -> bool {
        match self.0.get_mut(key) {
            Some(existing) => {
                *existing = value.to_string();
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}
