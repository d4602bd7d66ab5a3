mod error;
mod fallback;
mod filter;
mod intern;

use crate::{InputStream, Peeked};

/// Drains every character currently decodable, returning the UTF-8 bytes.
pub(crate) fn drain(stream: &mut InputStream<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        match stream.peek(0) {
            Peeked::Bytes(bytes) => {
                let len = bytes.len();
                out.extend_from_slice(bytes);
                stream.advance(len);
            }
            Peeked::Eof | Peeked::OutOfData => return out,
        }
    }
}

/// Splits `data` into non-empty chunks whose sizes cycle through `sizes`.
pub(crate) fn chunks_of<'a>(data: &'a [u8], sizes: &[u8]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while start < data.len() {
        let size = if sizes.is_empty() {
            1
        } else {
            (sizes[i % sizes.len()] as usize % 7) + 1
        };
        let end = (start + size).min(data.len());
        chunks.push(&data[start..end]);
        start = end;
        i += 1;
    }

    chunks
}
