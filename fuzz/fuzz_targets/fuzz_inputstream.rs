#![no_main]
use charstream::{InputStream, Peeked, Session};
use libfuzzer_sys::fuzz_target;

const HEADER: usize = 2; // 1 encoding selector + 1 chunk-size seed

/// Encodings exercised by the fuzzer: the native codecs, a single-byte and
/// a multi-byte fallback, and the sniffing path (`None`).
static ENCODINGS: &[Option<&str>] = &[
    Some("UTF-8"),
    Some("UTF-16"),
    Some("UTF-16BE"),
    Some("UTF-16LE"),
    Some("ISO-8859-1"),
    Some("Shift_JIS"),
    None,
];

fn drive(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let enc = ENCODINGS[data[0] as usize % ENCODINGS.len()];
    let chunk_size = (data[1] as usize % 17) + 1;
    let data = &data[HEADER..];

    let session = Session::with_default_aliases();
    let mut stream = match InputStream::new(&session, enc, 1, None) {
        Ok(stream) => stream,
        Err(_) => return,
    };

    let mut produced = 0usize;
    for chunk in data.chunks(chunk_size) {
        stream.append(chunk);
        drain(&mut stream, &mut produced);
    }

    stream.close();
    drain(&mut stream, &mut produced);

    // Whatever the input, a closed stream must settle on EOF.
    assert!(matches!(stream.peek(0), Peeked::Eof));
}

fn drain(stream: &mut InputStream<'_>, produced: &mut usize) {
    loop {
        match stream.peek(0) {
            Peeked::Bytes(bytes) => {
                // Every peeked character must be one well-formed UTF-8
                // scalar.
                let len = bytes.len();
                assert!(std::str::from_utf8(bytes).is_ok());
                assert!((1..=4).contains(&len));
                stream.advance(len);
                *produced += len;
            }
            Peeked::Eof | Peeked::OutOfData => return,
        }
    }
}

fuzz_target!(|data: &[u8]| drive(data));
