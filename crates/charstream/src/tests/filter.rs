use crate::codec::CodecResult;
use crate::{Error, Filter, Session};

#[test]
fn passes_utf8_through() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();
    let mut dst = [0u8; 32];

    let (result, read, written) = filter.process_chunk("héllo".as_bytes(), &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 6);
    assert_eq!(&dst[..written], "héllo".as_bytes());
}

#[test]
fn converts_latin1_to_utf8() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();
    filter.set_encoding("ISO-8859-1").unwrap();

    let mut dst = [0u8; 32];
    let (result, read, written) = filter.process_chunk(&[0xE9, 0x20, 0x61], &mut dst);

    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 3);
    assert_eq!(&dst[..written], &[0xC3, 0xA9, 0x20, 0x61]);
}

#[test]
fn retained_pivot_output_is_written_before_new_input() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();
    filter.set_encoding("ISO-8859-1").unwrap();

    let src = [0xE9u8; 10]; // ten é, two UTF-8 bytes each
    let mut collected = Vec::new();
    let mut remaining: &[u8] = &src;

    loop {
        let mut dst = [0u8; 3];
        let (result, read, written) = filter.process_chunk(remaining, &mut dst);
        collected.extend_from_slice(&dst[..written]);
        remaining = &remaining[read..];

        match result {
            CodecResult::Complete if remaining.is_empty() => break,
            CodecResult::Complete | CodecResult::OutputFull => {}
            other => panic!("unexpected result {other:?}"),
        }
    }

    assert_eq!(collected, "é".repeat(10).into_bytes());
}

#[test]
fn set_encoding_rejects_unknown_names() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();

    assert_eq!(filter.set_encoding("moose"), Err(Error::BadEncoding));

    // Still usable afterwards.
    let mut dst = [0u8; 8];
    let (result, _, written) = filter.process_chunk(b"ok", &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(&dst[..written], b"ok");
}

#[test]
fn set_encoding_to_the_current_charset_is_a_no_op() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();

    let before = filter.encoding();
    filter.set_encoding("utf8").unwrap();
    assert_eq!(filter.encoding(), before);
}

#[test]
fn reset_is_idempotent() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();

    let mut dst = [0u8; 8];
    filter.process_chunk(&[0xE2], &mut dst); // retain a partial sequence

    filter.reset();
    filter.reset();

    let (result, _, written) = filter.process_chunk(b"A", &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(&dst[..written], b"A");
}

#[test]
fn no_stale_bytes_survive_an_encoding_switch() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();
    filter.set_encoding("Shift_JIS").unwrap();

    let mut dst = [0u8; 16];
    // A dangling lead byte stays inside the read codec.
    filter.process_chunk(&[0x82], &mut dst);

    filter.set_encoding("UTF-16BE").unwrap();
    filter.reset();

    let (result, read, written) = filter.process_chunk(&[0x00, 0x41], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 2);
    assert_eq!(&dst[..written], b"A");
}

#[test]
fn lossless_bytes_round_trip_through_two_filters() {
    let session = Session::with_default_aliases();
    let original: &[u8] = b"les caf\xE9s inond\xE9s";

    // Forward: ISO-8859-1 to UTF-8.
    let mut to_utf8 = Filter::new(&session, "UTF-8").unwrap();
    to_utf8.set_encoding("ISO-8859-1").unwrap();
    let mut utf8 = [0u8; 64];
    let (result, _, utf8_len) = to_utf8.process_chunk(original, &mut utf8);
    assert_eq!(result, CodecResult::Complete);

    // Back: UTF-8 to ISO-8859-1.
    let mut from_utf8 = Filter::new(&session, "ISO-8859-1").unwrap();
    let mut back = [0u8; 64];
    let (result, _, back_len) = from_utf8.process_chunk(&utf8[..utf8_len], &mut back);
    assert_eq!(result, CodecResult::Complete);

    assert_eq!(&back[..back_len], original);
}

#[test]
fn flush_surfaces_a_truncated_tail() {
    let session = Session::with_default_aliases();
    let mut filter = Filter::new(&session, "UTF-8").unwrap();

    let mut dst = [0u8; 16];
    let (result, read, _) = filter.process_chunk(&[0x41, 0xE2, 0x82], &mut dst);
    assert_eq!(result, CodecResult::NeedData);
    assert_eq!(read, 3);

    let (result, read, written) = filter.process_chunk(&[], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 0);
    assert_eq!(&dst[..written], "\u{FFFD}".as_bytes());
}
