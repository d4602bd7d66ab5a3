//! Ordered interning dictionary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::intern::hash::hash_bytes;
use crate::intern::{ChunkArray, EntryRef};

const BUCKETS: usize = 77;

/// Key ordered by `(len, bytes)`.
#[derive(PartialEq, Eq)]
struct Key(Box<[u8]>);

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A dictionary keyed by `(len, bytes)` with ordered per-bucket traversal.
///
/// A bucket array of ordered trees: lookups hash to a bucket, and each
/// bucket iterates its entries in key order. Entry bytes are interned in a
/// [`ChunkArray`], so handles stay valid for the dictionary's lifetime.
pub struct Dict {
    buckets: Vec<BTreeMap<Key, EntryRef>>,
    data: ChunkArray,
}

impl Dict {
    pub fn new() -> Self {
        Self {
            buckets: (0..BUCKETS).map(|_| BTreeMap::new()).collect(),
            data: ChunkArray::new(),
        }
    }

    /// Interns `bytes`, returning the entry that now represents them.
    pub fn insert(&mut self, bytes: &[u8]) -> EntryRef {
        let bucket = hash_bytes(bytes) as usize % BUCKETS;
        let key = Key(bytes.into());

        if let Some(&entry) = self.buckets[bucket].get(&key) {
            return entry;
        }

        let entry = self.data.insert(bytes);
        self.buckets[bucket].insert(key, entry);
        entry
    }

    /// The bytes behind `entry`.
    pub fn get(&self, entry: EntryRef) -> &[u8] {
        self.data.get(entry)
    }

    /// Entries of one bucket in `(len, bytes)` order.
    pub fn iter_bucket(&self, bucket: usize) -> impl Iterator<Item = EntryRef> + '_ {
        self.buckets[bucket % BUCKETS].values().copied()
    }

    /// All entries, bucket by bucket, ordered within each bucket.
    pub fn iter(&self) -> impl Iterator<Item = EntryRef> + '_ {
        self.buckets.iter().flat_map(|b| b.values().copied())
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}
