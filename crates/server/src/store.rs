// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Entries the store is initialized with.
pub const SEED: [(i32, &str); 3] = [(1, "value1"), (2, "value2"), (3, "value3")];

/// Concurrent in-memory mapping of integer keys to string values.
///
/// Every operation is atomic with respect to a single key. [Store::list] may
/// observe a concurrent insert or removal either way.
#[derive(Debug, Default)]
pub struct Store(DashMap<i32, String>);

impl Store {
    /// Returns a store holding the [SEED] entries.
    pub fn seeded() -> Self {
        SEED.iter()
            .map(|&(key, value)| (key, value.to_string()))
            .collect()
    }

    pub fn list(&self) -> Vec<String> {
        self.0.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn get(&self, key: i32) -> Option<String> {
        self.0.get(&key).map(|entry| entry.value().clone())
    }

    /// Inserts `value` unless `key` is already present.
    ///
    /// Returns `false` and leaves the stored value untouched on duplicates.
    pub fn create(&self, key: i32, value: String) -> bool {
        match self.0.entry(key) {
            Entry::Vacant(entry) => {
                let _ = entry.insert(value);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn update(&self, key: i32, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    pub fn delete(&self, key: i32) -> Option<String> {
        self.0.remove(&key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i32, String)> for Store {
    fn from_iter<T: IntoIterator<Item = (i32, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
