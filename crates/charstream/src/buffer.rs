//! Growable byte buffer used by the input stream and the interning layer.

use crate::error::Error;

const DEFAULT_SIZE: usize = 256;

/// A growable byte buffer with explicit length/allocation semantics.
///
/// Growth at least doubles the allocation and the buffer never shrinks, so
/// offsets into the live region stay meaningful until the next mutating call.
#[derive(Debug)]
pub struct Buffer {
    pub(crate) data: Vec<u8>,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(DEFAULT_SIZE),
        }
    }

    /// Bytes currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current allocation, in bytes.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Appends `data` to the end of the buffer.
    pub fn append(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    /// Inserts `data` at `offset`, shifting everything after it up.
    pub fn insert(&mut self, offset: usize, data: &[u8]) -> Result<(), Error> {
        if offset > self.data.len() {
            return Err(Error::BadParm);
        }
        // Vec has no multi-byte insert; splice with an empty replacement range.
        self.data.splice(offset..offset, data.iter().copied());
        Ok(())
    }

    /// Removes `len` bytes starting at `offset`.
    pub fn discard(&mut self, offset: usize, len: usize) -> Result<(), Error> {
        if offset + len > self.data.len() {
            return Err(Error::BadParm);
        }
        self.data.drain(offset..offset + len);
        Ok(())
    }

    /// At least doubles the allocation.
    pub fn grow(&mut self) {
        let target = self.data.capacity().max(DEFAULT_SIZE) * 2;
        self.data.reserve(target - self.data.len());
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
