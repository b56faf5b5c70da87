//! Schema cache keyed by (instance, table).
//!
//! An explicit cache abstraction injected into the schema manager, so cache
//! eviction can sit next to every DDL call site instead of living in an
//! annotation. Lock-free reads via DashMap; mutations hold the key's entry
//! guard, making evict and populate atomic per key.
//!
//! Coherence under races: each key carries a monotonic version counter.
//! Eviction bumps the version; population carries the version observed
//! before introspection started and is discarded if an eviction has happened
//! in between. A population racing a later eviction therefore cannot
//! resurrect stale schema.

use dashmap::DashMap;
use dataforge_commons::{TableKey, TableSpec};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Slot {
    version: u64,
    spec: Option<Arc<TableSpec>>,
}

#[derive(Default)]
pub struct SchemaCache {
    slots: DashMap<TableKey, Slot>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema for a key, if present.
    pub fn get(&self, key: &TableKey) -> Option<Arc<TableSpec>> {
        let cached = self
            .slots
            .get(key)
            .and_then(|slot| slot.spec.as_ref().map(Arc::clone));
        match cached {
            Some(spec) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(spec)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Current version counter for a key. Read this *before* introspecting,
    /// pass it back to [`SchemaCache::put_if_current`].
    pub fn version(&self, key: &TableKey) -> u64 {
        self.slots.get(key).map(|slot| slot.version).unwrap_or(0)
    }

    /// Populate the cache unless the key was evicted since `observed_version`
    /// was read. Returns whether the value was stored.
    pub fn put_if_current(
        &self,
        key: TableKey,
        spec: Arc<TableSpec>,
        observed_version: u64,
    ) -> bool {
        let mut slot = self.slots.entry(key).or_default();
        if slot.version != observed_version {
            return false;
        }
        slot.spec = Some(spec);
        true
    }

    /// Drop any entry for the key and bump its version, invalidating
    /// in-flight populations that started before this call.
    pub fn evict(&self, key: &TableKey) {
        let mut slot = self.slots.entry(key.clone()).or_default();
        slot.version += 1;
        slot.spec = None;
    }

    /// Number of populated entries.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().spec.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// (size, hits, misses) — for the status endpoint and logs.
    pub fn stats(&self) -> (usize, u64, u64) {
        (
            self.len(),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
