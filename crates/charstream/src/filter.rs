//! Charset conversion filter.
//!
//! A two-stage converter from any source encoding to an internal one
//! (UTF-8 for the input stream): a read codec decodes input into a fixed
//! UCS-4 pivot, a write codec re-encodes the pivot. Pivot output that did
//! not fit the destination is remembered and re-encoded before any new
//! input is consumed.

use crate::codec::{Codec, CodecResult};
use crate::error::Error;
use crate::session::Session;

/// UCS-4 scalars held between the decode and encode stages.
const PIVOT_LEN: usize = 64;

pub struct Filter<'s> {
    session: &'s Session,
    read_codec: Box<dyn Codec>,
    write_codec: Box<dyn Codec>,
    pivot: [u32; PIVOT_LEN],
    /// Pivot output remaining from the last call.
    leftover: bool,
    pivot_pos: usize,
    pivot_len: usize,
    /// MIB enum of the current source encoding.
    encoding: u16,
}

impl<'s> Filter<'s> {
    /// Creates a filter converting into `int_enc` (UTF-8 for the input
    /// stream). The source side starts as UTF-8 until
    /// [`set_encoding`](Self::set_encoding) changes it.
    pub fn new(session: &'s Session, int_enc: &str) -> Result<Self, Error> {
        let read_codec = session.new_codec("UTF-8")?;
        let write_codec = session.new_codec(int_enc)?;
        let encoding = read_codec.mibenum();

        Ok(Self {
            session,
            read_codec,
            write_codec,
            pivot: [0; PIVOT_LEN],
            leftover: false,
            pivot_pos: 0,
            pivot_len: 0,
            encoding,
        })
    }

    /// Changes the source encoding.
    ///
    /// A name resolving to the current encoding is a no-op. Otherwise the
    /// read codec is replaced; the write side is never changed. Conversion
    /// state is kept — call [`reset`](Self::reset) to clear it.
    pub fn set_encoding(&mut self, name: &str) -> Result<(), Error> {
        let mib = self.session.mibenum_from_name(name);
        if mib == 0 {
            return Err(Error::BadEncoding);
        }
        if mib == self.encoding {
            return Ok(());
        }

        log::debug!(
            "source encoding change: {:?} -> {:?}",
            self.session.mibenum_to_name(self.encoding),
            self.session.mibenum_to_name(mib)
        );

        self.read_codec = self.session.new_codec(name)?;
        self.encoding = mib;

        Ok(())
    }

    /// MIB enum of the current source encoding.
    pub fn encoding(&self) -> u16 {
        self.encoding
    }

    /// Converts a chunk of source-encoded bytes into UTF-8.
    ///
    /// Returns the result with the number of source bytes consumed and the
    /// number of UTF-8 bytes written. [`CodecResult::OutputFull`] means the
    /// destination filled while input remains; the caller comes back with
    /// more room. An empty `src` flushes both stages.
    pub fn process_chunk(&mut self, src: &[u8], dst: &mut [u8]) -> (CodecResult, usize, usize) {
        let mut written = 0;

        if self.leftover {
            // Re-encode the retained pivot tail before touching new input.
            let (result, consumed, produced) = self.write_codec.encode(
                &self.pivot[self.pivot_pos..self.pivot_pos + self.pivot_len],
                dst,
            );
            written += produced;
            self.pivot_pos += consumed;
            self.pivot_len -= consumed;

            if result != CodecResult::Complete {
                return (result, 0, written);
            }

            self.pivot_pos = 0;
            self.pivot_len = 0;
            self.leftover = false;
        }

        if src.is_empty() {
            // Flush: drain anything the read codec retained.
            let (result, _, produced) = self.read_codec.decode(&[], &mut self.pivot);
            if produced > 0 {
                let (wres, consumed, out) =
                    self.write_codec.encode(&self.pivot[..produced], &mut dst[written..]);
                written += out;
                if wres != CodecResult::Complete {
                    self.leftover = true;
                    self.pivot_pos = consumed;
                    self.pivot_len = produced - consumed;
                    return (wres, 0, written);
                }
            }
            return (result, 0, written);
        }

        let mut read = 0;

        while read < src.len() {
            let (result, consumed, produced) =
                self.read_codec.decode(&src[read..], &mut self.pivot);
            read += consumed;

            if produced > 0 {
                let (wres, pivot_consumed, out) =
                    self.write_codec.encode(&self.pivot[..produced], &mut dst[written..]);
                written += out;

                if wres != CodecResult::Complete {
                    self.leftover = true;
                    self.pivot_pos = pivot_consumed;
                    self.pivot_len = produced - pivot_consumed;
                    return (wres, read, written);
                }
            }

            match result {
                CodecResult::Complete | CodecResult::OutputFull => {}
                other => return (other, read, written),
            }
        }

        (CodecResult::Complete, read, written)
    }

    /// Drops retained pivot output and resets both codecs.
    ///
    /// Calling it twice is the same as calling it once.
    pub fn reset(&mut self) {
        self.leftover = false;
        self.pivot_pos = 0;
        self.pivot_len = 0;
        self.read_codec.reset();
        self.write_codec.reset();
    }
}
