use crate::Error;

#[test]
fn errors_describe_themselves() {
    let cases = [
        (Error::BadParm, "bad parameter"),
        (Error::NoMem, "out of memory"),
        (Error::Invalid, "invalid input"),
        (Error::FileNotFound, "alias file not found"),
        (Error::NeedData, "need more data"),
        (Error::BadEncoding, "unsupported encoding"),
        (Error::Eof, "end of input"),
    ];

    for (error, message) in cases {
        assert_eq!(error.to_string(), message);
    }
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: E) {}
    assert_error(Error::Eof);
}
