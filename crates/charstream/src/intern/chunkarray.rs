//! Chunked insert-only byte arena.

const CHUNK_SIZE: usize = 4096;

/// Stable handle to an entry in a [`ChunkArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryRef {
    chunk: u32,
    offset: u32,
    len: u32,
}

struct Chunk {
    data: Box<[u8]>,
    used: usize,
}

/// An insert-only arena of byte entries.
///
/// Entries are copied into fixed-size chunks and never move or go away
/// before the arena is dropped, so an [`EntryRef`] stays valid for the
/// arena's whole lifetime. An item larger than a chunk gets a chunk of its
/// own.
pub struct ChunkArray {
    chunks: Vec<Chunk>,
}

impl ChunkArray {
    pub fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Copies `data` into the arena.
    pub fn insert(&mut self, data: &[u8]) -> EntryRef {
        if data.len() > CHUNK_SIZE {
            // Oversized items get a private chunk.
            let chunk = Chunk {
                data: data.to_vec().into_boxed_slice(),
                used: data.len(),
            };
            self.chunks.push(chunk);
            return EntryRef {
                chunk: (self.chunks.len() - 1) as u32,
                offset: 0,
                len: data.len() as u32,
            };
        }

        let fits = self
            .chunks
            .last()
            .is_some_and(|c| CHUNK_SIZE - c.used >= data.len());
        if !fits {
            self.chunks.push(Chunk {
                data: vec![0; CHUNK_SIZE].into_boxed_slice(),
                used: 0,
            });
        }

        let index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[index];
        let offset = chunk.used;
        chunk.data[offset..offset + data.len()].copy_from_slice(data);
        chunk.used += data.len();

        EntryRef {
            chunk: index as u32,
            offset: offset as u32,
            len: data.len() as u32,
        }
    }

    /// The bytes behind `entry`.
    pub fn get(&self, entry: EntryRef) -> &[u8] {
        let chunk = &self.chunks[entry.chunk as usize];
        let start = entry.offset as usize;
        &chunk.data[start..start + entry.len as usize]
    }
}

impl Default for ChunkArray {
    fn default() -> Self {
        Self::new()
    }
}
