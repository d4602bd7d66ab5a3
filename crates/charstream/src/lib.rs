//! Streaming charset detection and conversion primitives for markup parsers.
//!
//! This crate provides the text-ingestion plumbing shared by HTML, CSS and
//! related parsers: it takes raw bytes in some document encoding, works out
//! what that encoding is, converts the stream incrementally to UTF-8, and
//! exposes the result through a byte cursor that supports pushing synthetic
//! input back in. A small set of interning containers for deduplicating
//! parser atoms rides along.
//!
//! The pieces compose bottom-up: a [`Session`] owns the encoding alias
//! table and builds [`codec::Codec`]s; a [`Filter`] chains two codecs
//! through a UCS-4 pivot to convert anything to UTF-8; an [`InputStream`]
//! feeds appended bytes through a filter and cursors over the decoded text.
//!
//! # Examples
//!
//! ```rust
//! use charstream::{InputStream, Peeked, Session};
//!
//! let session = Session::with_default_aliases();
//! let mut stream = InputStream::new(&session, Some("ISO-8859-1"), 1, None).unwrap();
//!
//! stream.append(b"caf\xE9");
//! stream.close();
//!
//! let mut decoded = Vec::new();
//! loop {
//!     match stream.peek(0) {
//!         Peeked::Bytes(bytes) => {
//!             let len = bytes.len();
//!             decoded.extend_from_slice(bytes);
//!             stream.advance(len);
//!         }
//!         Peeked::Eof => break,
//!         Peeked::OutOfData => unreachable!("input is closed"),
//!     }
//! }
//! assert_eq!(decoded, "café".as_bytes());
//! ```

mod aliases;
mod buffer;
mod error;
mod filter;
mod inputstream;
mod session;

pub mod codec;
pub mod intern;

pub use aliases::CanonicalName;
pub use buffer::Buffer;
pub use codec::{Codec, CodecResult, ErrorMode};
pub use error::Error;
pub use filter::Filter;
pub use inputstream::{DetectFn, InputStream, Peeked};
pub use session::Session;

#[cfg(test)]
mod tests;
