// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed reconciliation between a model and the elements drawn for it.

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

/// Counts from the last reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Entries created during the pass.
    pub created: usize,
    /// Entries that existed before the pass and were visited again.
    pub kept: usize,
    /// Entries dropped by [`SceneIndex::finish`] because the pass did not visit them.
    pub removed: usize,
}

/// Key → value map reconciled in passes.
///
/// A pass starts with [`begin`](Self::begin), visits every key that should
/// exist with [`keep_or_create`](Self::keep_or_create), and ends with
/// [`finish`](Self::finish), which hands back the entries the pass did not
/// visit so the caller can tear down what they own. Keys visited in two
/// consecutive passes keep their value untouched.
///
/// ```rust
/// use arbor_scene::SceneIndex;
///
/// let mut index: SceneIndex<u32, &str> = SceneIndex::new();
/// index.begin();
/// index.keep_or_create(1, || Ok::<_, ()>("one")).unwrap();
/// index.keep_or_create(2, || Ok::<_, ()>("two")).unwrap();
/// assert!(index.finish().is_empty());
///
/// index.begin();
/// let (_, created) = index.keep_or_create(1, || Ok::<_, ()>("uno")).unwrap();
/// assert!(!created);
/// assert_eq!(index.finish(), [(2, "two")]);
/// assert_eq!(index.get(&1), Some(&"one"));
/// ```
pub struct SceneIndex<K, V> {
    entries: HashMap<K, Slot<V>>,
    pass: u64,
    stats: ReconcileStats,
}

struct Slot<V> {
    value: V,
    seen: u64,
}

impl<K, V> fmt::Debug for SceneIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneIndex")
            .field("entries", &self.entries.len())
            .field("pass", &self.pass)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K, V> Default for SceneIndex<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            pass: 0,
            stats: ReconcileStats::default(),
        }
    }
}

impl<K: Hash + Eq + Ord + Copy, V> SceneIndex<K, V> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a reconciliation pass.
    pub fn begin(&mut self) {
        self.pass += 1;
        self.stats = ReconcileStats::default();
    }

    /// Mark `key` as visited by the current pass, creating its value if absent.
    ///
    /// Returns the value and whether it was created. When `create` fails the
    /// index is left unchanged and the error is returned.
    pub fn keep_or_create<E>(
        &mut self,
        key: K,
        create: impl FnOnce() -> Result<V, E>,
    ) -> Result<(&mut V, bool), E> {
        let pass = self.pass;
        let (slot, created) = match self.entries.entry(key) {
            Entry::Occupied(slot) => {
                let slot = slot.into_mut();
                slot.seen = pass;
                self.stats.kept += 1;
                (slot, false)
            }
            Entry::Vacant(slot) => {
                let value = create()?;
                self.stats.created += 1;
                (slot.insert(Slot { value, seen: pass }), true)
            }
        };
        Ok((&mut slot.value, created))
    }

    /// End the pass: remove and return every entry it did not visit, ordered by key.
    pub fn finish(&mut self) -> Vec<(K, V)> {
        let pass = self.pass;
        let mut stale: Vec<(K, V)> = self
            .entries
            .extract_if(|_, slot| slot.seen != pass)
            .map(|(key, slot)| (key, slot.value))
            .collect();
        stale.sort_by(|a, b| a.0.cmp(&b.0));
        self.stats.removed = stale.len();
        #[cfg(feature = "tracing")]
        tracing::trace!(
            created = self.stats.created,
            kept = self.stats.kept,
            removed = self.stats.removed,
            "reconciled"
        );
        stale
    }

    /// Remove every entry, ordered by key.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let mut all: Vec<(K, V)> = self
            .entries
            .drain()
            .map(|(key, slot)| (key, slot.value))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Counts from the current (or last finished) pass.
    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Mutable value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key).map(|slot| &mut slot.value)
    }

    /// Whether `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.entries.keys().copied().collect();
        keys.sort();
        keys
    }
}
