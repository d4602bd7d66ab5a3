use crate::codec::{Codec, CodecResult, ErrorMode};
use crate::{Error, Session};

fn codec(name: &str) -> Box<dyn Codec> {
    Session::with_default_aliases().new_codec(name).unwrap()
}

#[test]
fn decodes_latin1_bytes() {
    let mut codec = codec("ISO-8859-1");
    let mut dst = [0u32; 8];

    let (result, read, written) = codec.decode(&[0xE9, 0x20, 0x61], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 3);
    assert_eq!(&dst[..written], [0xE9, 0x20, 0x61]);
}

#[test]
fn decodes_windows_1252_specials() {
    // 0x80 is the euro sign in windows-1252.
    let mut codec = codec("windows-1252");
    let mut dst = [0u32; 4];

    let (_, _, written) = codec.decode(&[0x80], &mut dst);
    assert_eq!(&dst[..written], [0x20AC]);
}

#[test]
fn encodes_back_to_the_native_charset() {
    let mut codec = codec("ISO-8859-1");
    let mut dst = [0u8; 8];

    let (result, read, written) = codec.encode(&[0xE9, 0x20, 0x61], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 3);
    assert_eq!(&dst[..written], &[0xE9, 0x20, 0x61]);
}

#[test]
fn unmappable_characters_become_question_marks_when_loose() {
    let mut codec = codec("ISO-8859-1");
    let mut dst = [0u8; 8];

    // U+4E16 has no windows-1252 representation.
    let (result, read, written) = codec.encode(&[0x4E16, 0x21], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 2);
    assert_eq!(&dst[..written], b"?!");
}

#[test]
fn unmappable_characters_stop_a_strict_encoder() {
    let mut codec = codec("ISO-8859-1");
    codec.set_error_mode(ErrorMode::Strict);
    let mut dst = [0u8; 8];

    let (result, read, written) = codec.encode(&[0x41, 0x4E16], &mut dst);
    assert_eq!(result, CodecResult::Invalid);
    assert_eq!((read, written), (1, 1));
}

#[test]
fn overflow_scalars_wait_in_the_pending_ring() {
    let mut codec = codec("ISO-8859-1");
    let mut tiny = [0u32; 1];

    let (result, read, written) = codec.decode(b"abc", &mut tiny);
    assert_eq!(result, CodecResult::OutputFull);
    assert_eq!((read, written), (3, 1));
    assert_eq!(tiny[0], 0x61);

    let mut rest = [0u32; 8];
    let (result, read, written) = codec.decode(&[], &mut rest);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 0);
    assert_eq!(&rest[..written], [0x62, 0x63]);
}

#[test]
fn incomplete_sequences_are_retained_across_calls() {
    let mut codec = codec("Shift_JIS");
    let mut dst = [0u32; 4];

    // 0x82 0xA0 is HIRAGANA LETTER A; split it over two calls.
    let (result, read, written) = codec.decode(&[0x82], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!((read, written), (1, 0));

    let (result, _, written) = codec.decode(&[0xA0], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(&dst[..written], [0x3042]);
}

#[test]
fn malformed_input_is_replaced_when_loose() {
    let mut codec = codec("Shift_JIS");
    let mut dst = [0u32; 8];

    let (result, read, written) = codec.decode(&[0x82, 0xFF, 0x41], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(read, 3);
    assert!(written >= 2);
    assert_eq!(dst[0], 0xFFFD);
    assert_eq!(dst[written - 1], 0x41);
}

#[test]
fn malformed_input_stops_a_strict_decoder() {
    let mut codec = codec("Shift_JIS");
    codec.set_error_mode(ErrorMode::Strict);
    let mut dst = [0u32; 8];

    let (result, _, _) = codec.decode(&[0x82, 0xFF, 0x41], &mut dst);
    assert_eq!(result, CodecResult::Invalid);

    // The decoder is usable again after the caller skips past the damage.
    let (result, _, written) = codec.decode(&[0x41], &mut dst);
    assert_eq!(result, CodecResult::Complete);
    assert_eq!(&dst[..written], [0x41]);
}

#[test]
fn unconvertible_charsets_are_refused() {
    let session = Session::with_default_aliases();
    // UTF-32 canonicalises but no codec claims it.
    assert!(matches!(
        session.new_codec("UTF-32"),
        Err(Error::BadEncoding)
    ));
    assert!(matches!(session.new_codec("moose"), Err(Error::BadEncoding)));
}
