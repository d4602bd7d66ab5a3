//! Native UTF-16 codec.
//!
//! Byte order is fixed by the canonical name for `UTF-16BE` and `UTF-16LE`.
//! Plain `UTF-16` inspects the first two bytes of the stream for a byte-order
//! mark and otherwise assumes big-endian; the tagged variants never sniff.

use crate::codec::{Codec, CodecResult, ErrorMode, REPLACEMENT};

pub(crate) fn handles(name: &str) -> bool {
    matches!(name, "UTF-16" | "UTF-16BE" | "UTF-16LE")
}

pub(crate) fn create(name: &str, mib: u16, _unicode: bool) -> Option<Box<dyn Codec>> {
    let variant = match name {
        "UTF-16BE" => Variant::Big,
        "UTF-16LE" => Variant::Little,
        "UTF-16" => Variant::Untagged,
        _ => return None,
    };
    Some(Box::new(Utf16Codec::new(mib, variant)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variant {
    Big,
    Little,
    /// Big-endian unless the stream opens with a little-endian BOM.
    Untagged,
}

pub(crate) struct Utf16Codec {
    mib: u16,
    mode: ErrorMode,
    variant: Variant,
    big_endian: bool,
    /// Whether the untagged variant has inspected the first unit.
    sniffed: bool,
    /// An odd byte left over from the previous call.
    partial: [u8; 1],
    partial_len: usize,
    /// A lead surrogate awaiting its trail.
    lead: Option<u16>,
}

impl Utf16Codec {
    pub(crate) fn new(mib: u16, variant: Variant) -> Self {
        Self {
            mib,
            mode: ErrorMode::default(),
            variant,
            big_endian: variant != Variant::Little,
            sniffed: variant != Variant::Untagged,
            partial: [0],
            partial_len: 0,
            lead: None,
        }
    }

    /// Consumes one unit's worth of bytes from the partial store and `src`.
    fn commit_unit(&mut self, read: &mut usize) {
        *read += 2 - self.partial_len;
        self.partial_len = 0;
    }
}

impl Codec for Utf16Codec {
    fn mibenum(&self) -> u16 {
        self.mib
    }

    fn error_mode(&self) -> ErrorMode {
        self.mode
    }

    fn set_error_mode(&mut self, mode: ErrorMode) {
        self.mode = mode;
    }

    fn decode(&mut self, src: &[u8], dst: &mut [u32]) -> (CodecResult, usize, usize) {
        if src.is_empty() {
            // Flush: an odd byte or an unpaired lead is an error at end of
            // input.
            if self.partial_len == 0 && self.lead.is_none() {
                return (CodecResult::Complete, 0, 0);
            }
            if self.mode.is_strict() {
                self.partial_len = 0;
                self.lead = None;
                return (CodecResult::Invalid, 0, 0);
            }
            if dst.is_empty() {
                return (CodecResult::OutputFull, 0, 0);
            }
            self.partial_len = 0;
            self.lead = None;
            dst[0] = REPLACEMENT;
            return (CodecResult::Complete, 0, 1);
        }

        let mut read = 0;
        let mut written = 0;

        loop {
            let avail = self.partial_len + (src.len() - read);
            if avail < 2 {
                if read < src.len() {
                    self.partial[0] = src[read];
                    self.partial_len = 1;
                    read += 1;
                }
                return if self.partial_len > 0 || self.lead.is_some() {
                    (CodecResult::NeedData, read, written)
                } else {
                    (CodecResult::Complete, read, written)
                };
            }

            // Assemble the next unit without consuming it.
            let b0 = if self.partial_len > 0 {
                self.partial[0]
            } else {
                src[read]
            };
            let b1 = src[read + 1 - self.partial_len];
            let unit = if self.big_endian {
                u16::from_be_bytes([b0, b1])
            } else {
                u16::from_le_bytes([b0, b1])
            };

            if !self.sniffed {
                self.sniffed = true;
                if unit == 0xFEFF {
                    self.commit_unit(&mut read);
                    continue;
                }
                if unit == 0xFFFE {
                    // A little-endian BOM read big-endian.
                    self.big_endian = false;
                    self.commit_unit(&mut read);
                    continue;
                }
            }

            if let Some(lead) = self.lead {
                if (0xDC00..=0xDFFF).contains(&unit) {
                    if written == dst.len() {
                        return (CodecResult::OutputFull, read, written);
                    }
                    dst[written] = 0x10000
                        + ((u32::from(lead) - 0xD800) << 10)
                        + (u32::from(unit) - 0xDC00);
                    written += 1;
                    self.lead = None;
                    self.commit_unit(&mut read);
                    continue;
                }
                // Unpaired lead; the current unit is left for reprocessing.
                if self.mode.is_strict() {
                    self.lead = None;
                    return (CodecResult::Invalid, read, written);
                }
                if written == dst.len() {
                    return (CodecResult::OutputFull, read, written);
                }
                self.lead = None;
                dst[written] = REPLACEMENT;
                written += 1;
                continue;
            }

            match unit {
                0xD800..=0xDBFF => {
                    self.lead = Some(unit);
                    self.commit_unit(&mut read);
                }
                0xDC00..=0xDFFF => {
                    // Stray trail surrogate.
                    if self.mode.is_strict() {
                        return (CodecResult::Invalid, read, written);
                    }
                    if written == dst.len() {
                        return (CodecResult::OutputFull, read, written);
                    }
                    dst[written] = REPLACEMENT;
                    written += 1;
                    self.commit_unit(&mut read);
                }
                _ => {
                    if written == dst.len() {
                        return (CodecResult::OutputFull, read, written);
                    }
                    dst[written] = u32::from(unit);
                    written += 1;
                    self.commit_unit(&mut read);
                }
            }
        }
    }

    fn encode(&mut self, src: &[u32], dst: &mut [u8]) -> (CodecResult, usize, usize) {
        let mut read = 0;
        let mut written = 0;

        while read < src.len() {
            let mut cp = src[read];

            if (0xD800..=0xDFFF).contains(&cp) || cp > 0x10_FFFF {
                if self.mode.is_strict() {
                    return (CodecResult::Invalid, read, written);
                }
                cp = REPLACEMENT;
            }

            if cp < 0x10000 {
                if dst.len() - written < 2 {
                    return (CodecResult::OutputFull, read, written);
                }
                self.put_unit(cp as u16, &mut dst[written..]);
                written += 2;
            } else {
                if dst.len() - written < 4 {
                    return (CodecResult::OutputFull, read, written);
                }
                let v = cp - 0x10000;
                self.put_unit(0xD800 + (v >> 10) as u16, &mut dst[written..]);
                self.put_unit(0xDC00 + (v & 0x3FF) as u16, &mut dst[written + 2..]);
                written += 4;
            }

            read += 1;
        }

        (CodecResult::Complete, read, written)
    }

    fn reset(&mut self) {
        self.partial_len = 0;
        self.lead = None;
        self.big_endian = self.variant != Variant::Little;
        self.sniffed = self.variant != Variant::Untagged;
    }
}

impl Utf16Codec {
    fn put_unit(&self, unit: u16, out: &mut [u8]) {
        let bytes = if self.big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        out[..2].copy_from_slice(&bytes);
    }
}
