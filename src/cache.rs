//! Interning cache for recently seen small values.
//!
//! A fixed power-of-two slot table indexed by value hash. A lookup that
//! finds an equal value returns the shared allocation; a miss overwrites
//! the slot. The cache is an explicit collaborator handed to whoever wants
//! interning; clearing or bypassing it never changes semantics, only
//! allocation behavior.

use crate::types::value::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

const DEFAULT_CAPACITY: usize = 1024;

/// Values above this footprint are never cached.
const MAX_ELEMENT_MEMORY: usize = 4096;

type SlotTable = Box<[Option<Arc<Value>>]>;

pub struct ValueCache {
    /// `None` until first use and again after `clear`; the whole table is
    /// dropped and lazily recreated, releasing every retained value.
    slots: Mutex<Option<SlotTable>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ValueCache {
    /// A cache with the requested number of slots, rounded up to a power
    /// of two so the hash maps to a slot by masking.
    pub fn with_capacity(capacity: usize) -> ValueCache {
        ValueCache {
            slots: Mutex::new(None),
            capacity: capacity.max(1).next_power_of_two(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return a shared allocation for the value, reusing the cached one
    /// when an equal value occupies its slot. Oversized values bypass the
    /// table entirely.
    pub fn intern(&self, value: Value) -> Arc<Value> {
        if value.memory() > MAX_ELEMENT_MEMORY {
            return Arc::new(value);
        }
        let index = self.slot_index(&value);
        let mut guard = self.lock();
        let table = guard
            .get_or_insert_with(|| vec![None; self.capacity].into_boxed_slice());
        if let Some(cached) = &table[index] {
            if **cached == value {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(cached);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(value);
        table[index] = Some(Arc::clone(&shared));
        shared
    }

    /// Drop the whole slot table. The next `intern` recreates it empty.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn slot_index(&self, value: &Value) -> usize {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish() as usize & (self.capacity - 1)
    }

    fn lock(&self) -> MutexGuard<'_, Option<SlotTable>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            // The table holds immutable values only; a panic mid-intern
            // cannot leave it inconsistent.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for ValueCache {
    fn default() -> ValueCache {
        ValueCache::with_capacity(DEFAULT_CAPACITY)
    }
}
