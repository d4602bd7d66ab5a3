//! Buffered input stream with incremental charset conversion.
//!
//! Raw document bytes accumulate in one buffer; refills run them through a
//! conversion [`Filter`] into a second, UTF-8 buffer that a byte cursor
//! walks. The first refill locks the charset — from the caller, a detector
//! callback, or the UTF-8 default — and strips a leading byte-order mark.

use crate::buffer::Buffer;
use crate::codec::{utf8, CodecResult};
use crate::error::Error;
use crate::filter::Filter;
use crate::session::Session;

/// Charset detection callback.
///
/// Receives the first chunk of raw data and returns the detected MIB enum
/// and encoding-source priority, or `None` to decline (the stream then
/// falls back to UTF-8).
pub type DetectFn = fn(&[u8]) -> Option<(u16, u32)>;

/// Result of a [`peek`](InputStream::peek).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peeked<'a> {
    /// One complete UTF-8 character. The borrow ends at the next mutating
    /// call; once the cursor has advanced past the character, peek again.
    Bytes(&'a [u8]),
    /// The stream is exhausted and EOF has been flagged.
    Eof,
    /// No decoded data at this offset yet, but more may arrive.
    OutOfData,
}

enum Bom {
    Stripped,
    Absent,
    /// The buffer holds a strict prefix of the expected mark.
    NeedMore,
}

enum Step {
    Have(usize),
    Refill,
    Eof,
    OutOfData,
}

pub struct InputStream<'s> {
    session: &'s Session,
    /// Raw document-encoded bytes not yet converted.
    raw: Buffer,
    /// Converted UTF-8 data the cursor walks.
    utf8: Buffer,
    cursor: usize,
    had_eof: bool,
    eof_flushed: bool,
    done_first_chunk: bool,
    mibenum: u16,
    encsrc: u32,
    filter: Filter<'s>,
    csdetect: Option<DetectFn>,
}

impl<'s> InputStream<'s> {
    /// Creates an input stream.
    ///
    /// `enc` fixes the document charset; `None` (or an unrecognized name)
    /// means sniff, using `csdetect` on the first chunk when provided.
    /// `encsrc` is the caller's priority class for a fixed charset, with 0
    /// reserved for the fallback default.
    pub fn new(
        session: &'s Session,
        enc: Option<&str>,
        encsrc: u32,
        csdetect: Option<DetectFn>,
    ) -> Result<Self, Error> {
        let mut filter = Filter::new(session, "UTF-8")?;

        let mut mibenum = 0;
        let mut source = 0;
        if let Some(name) = enc {
            mibenum = session.mibenum_from_name(name);
            if mibenum != 0 {
                filter.set_encoding(name)?;
                source = encsrc;
            }
        }

        Ok(Self {
            session,
            raw: Buffer::new(),
            utf8: Buffer::new(),
            cursor: 0,
            had_eof: false,
            eof_flushed: false,
            done_first_chunk: false,
            mibenum,
            encsrc: source,
            filter,
            csdetect,
        })
    }

    /// Appends raw document bytes.
    pub fn append(&mut self, data: &[u8]) {
        self.raw.append(data);
    }

    /// Flags the end of the document.
    pub fn close(&mut self) {
        self.had_eof = true;
    }

    /// Splices UTF-8 text into the stream at the cursor.
    ///
    /// The inserted bytes are visible to the next [`peek`](Self::peek);
    /// used for `document.write`-style re-entry.
    pub fn insert(&mut self, data: &str) -> Result<(), Error> {
        self.utf8.insert(self.cursor, data.as_bytes())
    }

    /// Looks at the character starting `offset` bytes past the cursor.
    pub fn peek(&mut self, offset: usize) -> Peeked<'_> {
        loop {
            let step = self.peek_step(offset);
            match step {
                Step::Have(len) => {
                    let start = self.cursor + offset;
                    return Peeked::Bytes(&self.utf8.data[start..start + len]);
                }
                Step::Refill => {
                    if self.refill().is_err() {
                        return Peeked::OutOfData;
                    }
                }
                Step::Eof => return Peeked::Eof,
                Step::OutOfData => return Peeked::OutOfData,
            }
        }
    }

    fn peek_step(&self, offset: usize) -> Step {
        let pos = self.cursor + offset;

        if pos < self.utf8.len() {
            let window = &self.utf8.data[pos..];
            if window[0] & 0x80 == 0 {
                return Step::Have(1);
            }
            match utf8::char_byte_length(window) {
                Ok(len) => return Step::Have(len),
                // The character is split at the end of the buffer; decode
                // more before retrying.
                Err(Error::NeedData) => {}
                Err(_) => return Step::OutOfData,
            }
        }

        if self.raw.is_empty() {
            if self.had_eof {
                if !self.eof_flushed && self.done_first_chunk {
                    // One filter flush may still surface a replacement
                    // character for a truncated final sequence.
                    return Step::Refill;
                }
                return Step::Eof;
            }
            return Step::OutOfData;
        }

        Step::Refill
    }

    /// Moves the cursor forward.
    ///
    /// # Panics
    ///
    /// Panics when `bytes` would move past the end of the decoded data;
    /// that is a caller bug, not a recoverable condition.
    pub fn advance(&mut self, bytes: usize) {
        assert!(
            bytes <= self.utf8.len() - self.cursor,
            "advance past end of decoded data"
        );
        if self.cursor == self.utf8.len() {
            return;
        }
        self.cursor += bytes;
    }

    /// The current charset and its encoding-source priority.
    ///
    /// Reports `("UTF-8", 0)` until something with a higher priority class
    /// has fixed the charset.
    pub fn read_charset(&self) -> (&str, u32) {
        if self.encsrc == 0 {
            return ("UTF-8", 0);
        }
        (
            self.session.mibenum_to_name(self.mibenum).unwrap_or("UTF-8"),
            self.encsrc,
        )
    }

    /// Converts raw bytes into the UTF-8 buffer.
    fn refill(&mut self) -> Result<(), Error> {
        if !self.done_first_chunk {
            self.first_chunk()?;
        }

        // Reuse the whole buffer when everything before the cursor is
        // consumed; otherwise slide the live tail down and grow if it still
        // fills more than half the allocation.
        if self.cursor == self.utf8.len() {
            self.utf8.clear();
        } else {
            self.utf8.discard(0, self.cursor)?;
            if self.utf8.len() > self.utf8.allocated() / 2 {
                self.utf8.grow();
            }
        }
        self.cursor = 0;

        if self.utf8.len() == self.utf8.allocated() {
            self.utf8.grow();
        }

        let old_len = self.utf8.len();
        let capacity = self.utf8.allocated();
        self.utf8.data.resize(capacity, 0);

        let (result, read, written) = self
            .filter
            .process_chunk(self.raw.as_slice(), &mut self.utf8.data[old_len..]);
        self.utf8.data.truncate(old_len + written);

        log::trace!(
            "refill: consumed {read} raw bytes, wrote {written} ({result:?})"
        );

        // More input than output room is fine; the next refill continues.
        self.raw.discard(0, read)?;
        match result {
            CodecResult::Complete | CodecResult::OutputFull | CodecResult::NeedData => {}
            CodecResult::Invalid => return Err(Error::Invalid),
        }

        if self.had_eof && self.raw.is_empty() && !self.eof_flushed {
            self.flush_eof();
        }

        Ok(())
    }

    /// Locks the charset and strips the byte-order mark; first chunk only.
    fn first_chunk(&mut self) -> Result<(), Error> {
        let mut mibenum = self.mibenum;
        let mut encsrc = self.encsrc;

        if mibenum == 0 {
            if let Some(detect) = self.csdetect {
                if let Some((mib, source)) = detect(self.raw.as_slice()) {
                    mibenum = mib;
                    encsrc = source;
                }
            }
            if mibenum == 0 {
                mibenum = self.session.known().utf8;
                encsrc = 0;
            }
        }

        assert!(mibenum != 0, "alias data does not define UTF-8");

        match self.strip_bom(mibenum) {
            Bom::Stripped | Bom::Absent => {}
            Bom::NeedMore => {
                if !self.had_eof {
                    // Wait for the rest of the mark before locking in; the
                    // detector runs again with the fuller chunk.
                    return Err(Error::NeedData);
                }
            }
        }

        self.mibenum = mibenum;
        self.encsrc = encsrc;

        if self.mibenum != self.filter.encoding() {
            let name = self
                .session
                .mibenum_to_name(self.mibenum)
                .ok_or(Error::BadEncoding)?
                .to_owned();
            self.filter.set_encoding(&name)?;
        }

        log::debug!(
            "charset locked: {:?} (source {})",
            self.session.mibenum_to_name(self.mibenum),
            self.encsrc
        );

        self.done_first_chunk = true;
        Ok(())
    }

    /// Strips the byte-order mark matching the locked charset.
    ///
    /// Keyed on the exact MIB enum: UTF-32LE's mark starts with UTF-16LE's,
    /// so the charset, not the bytes, decides which pattern applies.
    fn strip_bom(&mut self, mibenum: u16) -> Bom {
        let known = self.session.known();
        let pattern: &[u8] = if mibenum == known.utf8 {
            &[0xEF, 0xBB, 0xBF]
        } else if mibenum == known.utf16be {
            &[0xFE, 0xFF]
        } else if mibenum == known.utf16le {
            &[0xFF, 0xFE]
        } else if mibenum == known.utf32be {
            &[0x00, 0x00, 0xFE, 0xFF]
        } else if mibenum == known.utf32le {
            &[0xFF, 0xFE, 0x00, 0x00]
        } else {
            return Bom::Absent;
        };

        let have = self.raw.as_slice();
        if have.len() >= pattern.len() {
            if &have[..pattern.len()] == pattern {
                // Cannot fail: the range is within the buffer.
                let _ = self.raw.discard(0, pattern.len());
                return Bom::Stripped;
            }
            return Bom::Absent;
        }

        if pattern.starts_with(have) {
            return Bom::NeedMore;
        }

        Bom::Absent
    }

    /// Flushes the filter once the raw data is exhausted at EOF, so a
    /// truncated final sequence surfaces before [`Peeked::Eof`].
    fn flush_eof(&mut self) {
        let old_len = self.utf8.len();
        let capacity = self.utf8.allocated();
        if old_len == capacity {
            // No room; the next refill retries.
            return;
        }
        self.utf8.data.resize(capacity, 0);

        let (result, _, written) = self.filter.process_chunk(&[], &mut self.utf8.data[old_len..]);
        self.utf8.data.truncate(old_len + written);

        match result {
            CodecResult::OutputFull => {}
            _ => self.eof_flushed = true,
        }
    }
}
