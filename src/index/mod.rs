//! Index Module
//!
//! In-memory mapping of key → file offset, built by one scan at open.
//!
//! ## Responsibilities
//! - Map every live key to the offset of its entry's content-length field
//! - Rebuild itself from the file without touching any payload bytes
//! - Rebase offsets after compaction removes an entry
//!
//! The index is the only per-key state held in memory; values stay on disk
//! until read.

mod builder;

use std::collections::hash_map;
use std::collections::HashMap;

use crate::format::Key;

pub use builder::{IndexBuilder, ScanSummary};

/// Key → offset of the entry's content-length field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    offsets: HashMap<Key, u64>,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the key's content-length field
    pub fn get(&self, key: &Key) -> Option<u64> {
        self.offsets.get(key).copied()
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.offsets.contains_key(key)
    }

    /// Record a key, returning the previous offset if it was already present
    pub fn insert(&mut self, key: Key, offset: u64) -> Option<u64> {
        self.offsets.insert(key, offset)
    }

    pub fn remove(&mut self, key: &Key) -> Option<u64> {
        self.offsets.remove(key)
    }

    /// Shift every offset past `removed_at` back by `delta` bytes
    ///
    /// Called after compaction removed `delta` bytes that all lay before
    /// any surviving offset greater than `removed_at`.
    pub fn rebase_after(&mut self, removed_at: u64, delta: u64) {
        for offset in self.offsets.values_mut() {
            if *offset > removed_at {
                *offset -= delta;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterate over keys in arbitrary order
    pub fn keys(&self) -> hash_map::Keys<'_, Key, u64> {
        self.offsets.keys()
    }

    /// Iterate over (key, offset) pairs in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, Key, u64> {
        self.offsets.iter()
    }
}
