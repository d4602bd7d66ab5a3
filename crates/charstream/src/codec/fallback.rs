//! Fallback codec for everything the native codecs do not claim.
//!
//! Wraps an `encoding_rs` decoder/encoder pair. Incomplete input sequences
//! are retained by the inner converter across calls; decoded scalars that do
//! not fit the output buffer are held in a small pending ring and drained
//! first on the next call.

use encoding_rs::{CoderResult, Decoder, DecoderResult, Encoder, EncoderResult, Encoding};

use crate::codec::{Codec, CodecResult, ErrorMode};

/// Pending decoded scalars retained when the output buffer runs out.
const PENDING_SLOTS: usize = 8;
/// Pending encoded bytes retained when the output buffer runs out.
const OUT_SLOTS: usize = 32;

pub(crate) fn handles(name: &str) -> bool {
    Encoding::for_label(name.as_bytes()).is_some()
}

pub(crate) fn create(name: &str, mib: u16, unicode: bool) -> Option<Box<dyn Codec>> {
    let encoding = Encoding::for_label(name.as_bytes())?;
    Some(Box::new(FallbackCodec::new(encoding, mib, unicode)))
}

pub(crate) struct FallbackCodec {
    mib: u16,
    mode: ErrorMode,
    /// Whether the target charset is a Unicode variant; decides the Loose
    /// encode substitute (U+FFFD versus `?`).
    unicode: bool,
    encoding: &'static Encoding,
    decoder: Decoder,
    encoder: Encoder,
    pending: [u32; PENDING_SLOTS],
    pending_start: usize,
    pending_len: usize,
    out: [u8; OUT_SLOTS],
    out_start: usize,
    out_len: usize,
}

enum WriteChar {
    Written,
    /// Part of the character's output was stashed; the caller must return
    /// `OutputFull` after consuming the character.
    Stashed,
    Unmappable,
}

impl FallbackCodec {
    pub(crate) fn new(encoding: &'static Encoding, mib: u16, unicode: bool) -> Self {
        Self {
            mib,
            mode: ErrorMode::default(),
            unicode,
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
            encoder: encoding.new_encoder(),
            pending: [0; PENDING_SLOTS],
            pending_start: 0,
            pending_len: 0,
            out: [0; OUT_SLOTS],
            out_start: 0,
            out_len: 0,
        }
    }

    fn push_pending(&mut self, cp: u32) {
        debug_assert!(self.pending_len < PENDING_SLOTS);
        self.pending[(self.pending_start + self.pending_len) % PENDING_SLOTS] = cp;
        self.pending_len += 1;
    }

    fn pop_pending(&mut self) -> u32 {
        debug_assert!(self.pending_len > 0);
        let cp = self.pending[self.pending_start];
        self.pending_start = (self.pending_start + 1) % PENDING_SLOTS;
        self.pending_len -= 1;
        cp
    }

    fn substitute(&self) -> char {
        if self.unicode {
            '\u{FFFD}'
        } else {
            '?'
        }
    }

    /// Encodes one character, writing to `dst` and stashing any overflow.
    fn write_char(&mut self, ch: char, dst: &mut [u8], written: &mut usize) -> WriteChar {
        let mut utf8 = [0u8; 4];
        let s: &str = ch.encode_utf8(&mut utf8);
        let mut local = [0u8; OUT_SLOTS];

        let (result, _, produced) =
            self.encoder
                .encode_from_utf8_without_replacement(s, &mut local, false);

        match result {
            EncoderResult::InputEmpty => {
                let fit = (dst.len() - *written).min(produced);
                dst[*written..*written + fit].copy_from_slice(&local[..fit]);
                *written += fit;
                if fit < produced {
                    self.out[..produced - fit].copy_from_slice(&local[fit..produced]);
                    self.out_start = 0;
                    self.out_len = produced - fit;
                    WriteChar::Stashed
                } else {
                    WriteChar::Written
                }
            }
            // A single character never overflows the local buffer.
            EncoderResult::OutputFull => unreachable!("single-character encode overflow"),
            EncoderResult::Unmappable(_) => WriteChar::Unmappable,
        }
    }
}

impl Codec for FallbackCodec {
    fn mibenum(&self) -> u16 {
        self.mib
    }

    fn error_mode(&self) -> ErrorMode {
        self.mode
    }

    fn set_error_mode(&mut self, mode: ErrorMode) {
        if mode != self.mode {
            // The inner converters cannot switch replacement behaviour
            // mid-sequence; start them afresh.
            self.decoder = self.encoding.new_decoder_without_bom_handling();
            self.encoder = self.encoding.new_encoder();
        }
        self.mode = mode;
    }

    fn decode(&mut self, src: &[u8], dst: &mut [u32]) -> (CodecResult, usize, usize) {
        let mut read = 0;
        let mut written = 0;

        while self.pending_len > 0 {
            if written == dst.len() {
                return (CodecResult::OutputFull, read, written);
            }
            dst[written] = self.pop_pending();
            written += 1;
        }

        let last = src.is_empty();

        loop {
            if read == src.len() && !last {
                return (CodecResult::Complete, read, written);
            }
            if written == dst.len() && !last {
                return (CodecResult::OutputFull, read, written);
            }

            // Cap the scratch buffer so every scalar this round fits in the
            // remaining output plus the pending ring (one scalar needs at
            // least one scratch byte).
            let room = (dst.len() - written) + PENDING_SLOTS;
            let cap = room.min(64);
            let mut scratch = [0u8; 64];

            let (result, consumed, produced) = if self.mode.is_strict() {
                self.decoder.decode_to_utf8_without_replacement(
                    &src[read..],
                    &mut scratch[..cap],
                    last,
                )
            } else {
                let (result, consumed, produced, _replaced) =
                    self.decoder
                        .decode_to_utf8(&src[read..], &mut scratch[..cap], last);
                let result = match result {
                    CoderResult::InputEmpty => DecoderResult::InputEmpty,
                    CoderResult::OutputFull => DecoderResult::OutputFull,
                };
                (result, consumed, produced)
            };
            read += consumed;

            // Unsafe: written by the inner decoder, whose contract is to
            // produce well-formed UTF-8.
            let text = unsafe { std::str::from_utf8_unchecked(&scratch[..produced]) };
            for ch in text.chars() {
                if written < dst.len() {
                    dst[written] = u32::from(ch);
                    written += 1;
                } else {
                    self.push_pending(u32::from(ch));
                }
            }

            match result {
                DecoderResult::InputEmpty => {
                    if last {
                        // The stream is finished; start afresh for any
                        // subsequent input.
                        self.decoder = self.encoding.new_decoder_without_bom_handling();
                    }
                    return if self.pending_len > 0 {
                        (CodecResult::OutputFull, read, written)
                    } else {
                        (CodecResult::Complete, read, written)
                    };
                }
                DecoderResult::OutputFull => {
                    if self.pending_len > 0 {
                        return (CodecResult::OutputFull, read, written);
                    }
                    // The scratch buffer was the limit; go round again.
                }
                DecoderResult::Malformed(n, extra) => {
                    let bad = usize::from(n) + usize::from(extra);
                    let at = read.saturating_sub(bad);
                    self.decoder = self.encoding.new_decoder_without_bom_handling();
                    return (CodecResult::Invalid, at, written);
                }
            }
        }
    }

    fn encode(&mut self, src: &[u32], dst: &mut [u8]) -> (CodecResult, usize, usize) {
        let mut read = 0;
        let mut written = 0;

        while self.out_len > 0 {
            if written == dst.len() {
                // Nothing has been read yet; the caller retries with room.
                return (CodecResult::OutputFull, 0, written);
            }
            dst[written] = self.out[self.out_start];
            self.out_start += 1;
            self.out_len -= 1;
            written += 1;
        }

        while read < src.len() {
            let ch = match char::from_u32(src[read]) {
                Some(c) => c,
                None => {
                    if self.mode.is_strict() {
                        return (CodecResult::Invalid, read, written);
                    }
                    self.substitute()
                }
            };

            match self.write_char(ch, dst, &mut written) {
                WriteChar::Written => read += 1,
                WriteChar::Stashed => {
                    read += 1;
                    return (CodecResult::OutputFull, read, written);
                }
                WriteChar::Unmappable => {
                    if self.mode.is_strict() {
                        return (CodecResult::Invalid, read, written);
                    }
                    let sub = self.substitute();
                    match self.write_char(sub, dst, &mut written) {
                        WriteChar::Written => read += 1,
                        WriteChar::Stashed => {
                            read += 1;
                            return (CodecResult::OutputFull, read, written);
                        }
                        // `?` and U+FFFD are representable wherever they are
                        // used as substitutes.
                        WriteChar::Unmappable => {
                            return (CodecResult::Invalid, read, written);
                        }
                    }
                }
            }
        }

        (CodecResult::Complete, read, written)
    }

    fn reset(&mut self) {
        self.decoder = self.encoding.new_decoder_without_bom_handling();
        self.encoder = self.encoding.new_encoder();
        self.pending_start = 0;
        self.pending_len = 0;
        self.out_start = 0;
        self.out_len = 0;
    }
}
