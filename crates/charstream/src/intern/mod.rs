//! Atom interning containers.
//!
//! Parsers built on this crate deduplicate tag names, attribute values and
//! string literals through these containers: a chunked arena with stable
//! entry handles, an insert-only hash interner over it, and an ordered
//! dictionary for callers that also need sorted traversal.

mod chunkarray;
mod dict;
mod hash;

pub use chunkarray::{ChunkArray, EntryRef};
pub use dict::Dict;
pub use hash::HashInterner;
