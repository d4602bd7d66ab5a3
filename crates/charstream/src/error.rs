use thiserror::Error;

/// Errors reported by the library.
///
/// Errors are plain values; streaming paths that need to distinguish
/// "output buffer full" from genuine failure use [`CodecResult`] instead.
///
/// [`CodecResult`]: crate::codec::CodecResult
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A parameter was outside the range the operation accepts.
    #[error("bad parameter")]
    BadParm,

    /// A buffer or table could not be grown.
    #[error("out of memory")]
    NoMem,

    /// The input (or an encoding name) is not valid.
    #[error("invalid input")]
    Invalid,

    /// The alias data file could not be read.
    #[error("alias file not found")]
    FileNotFound,

    /// The input ends part-way through a sequence; more is needed.
    #[error("need more data")]
    NeedData,

    /// No codec is available for the requested encoding.
    #[error("unsupported encoding")]
    BadEncoding,

    /// The end of the stream has been reached.
    #[error("end of input")]
    Eof,
}
