//! Insert-only hash interner.

use crate::intern::{ChunkArray, EntryRef};

const DEFAULT_SLOTS: usize = 1 << 6;

/// An insert-only interner with stable entries.
///
/// Open addressing with linear probing over a power-of-two slot table;
/// entry bytes live in a [`ChunkArray`], so a returned [`EntryRef`] stays
/// valid for the interner's lifetime. Inserting bytes already present
/// returns the existing entry.
pub struct HashInterner {
    slots: Vec<Option<EntryRef>>,
    used: usize,
    data: ChunkArray,
}

impl HashInterner {
    pub fn new() -> Self {
        Self {
            slots: vec![None; DEFAULT_SLOTS],
            used: 0,
            data: ChunkArray::new(),
        }
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Interns `bytes`, returning the entry that now represents them.
    pub fn insert(&mut self, bytes: &[u8]) -> EntryRef {
        // Grow at 3/4 load so probe chains stay short.
        if self.used >= self.slots.len() - self.slots.len() / 4 {
            self.grow();
        }

        let mask = self.slots.len() - 1;
        let mut index = hash_bytes(bytes) as usize & mask;

        while let Some(entry) = self.slots[index] {
            if self.data.get(entry) == bytes {
                return entry;
            }
            index = (index + 1) & mask;
        }

        let entry = self.data.insert(bytes);
        self.slots[index] = Some(entry);
        self.used += 1;
        entry
    }

    /// The bytes behind `entry`.
    pub fn get(&self, entry: EntryRef) -> &[u8] {
        self.data.get(entry)
    }

    fn grow(&mut self) {
        let new_len = self.slots.len() * 2;
        let mask = new_len - 1;
        let mut slots = vec![None; new_len];

        for entry in self.slots.iter().flatten() {
            let mut index = hash_bytes(self.data.get(*entry)) as usize & mask;
            while slots[index].is_some() {
                index = (index + 1) & mask;
            }
            slots[index] = Some(*entry);
        }

        self.slots = slots;
    }
}

impl Default for HashInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// djb2-xor over the raw bytes.
pub(crate) fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &b in bytes {
        h = h.wrapping_mul(33) ^ u32::from(b);
    }
    h
}
