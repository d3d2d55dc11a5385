// We want a few things here:
// 1. A closed taxonomy of failure kinds that callers can match on without
//    parsing message text, since codec errors are part of the API contract.
// 2. A backtrace captured at creation, to centralize setting a breakpoint
//    that traps any error in the system soon after it exists.
// 3. Same but for logging: every error is emitted into the tracing system
//    once, when it is created, never when it is propagated.

use std::borrow::Cow;

use backtrace_error::DynBacktraceError;
use tracing::error;

#[cfg(test)]
use test_log::test;

/// Failure kinds surfaced by the codec, container, and trie layers.
///
/// Encoders raise `BufferTooSmall` when the caller-supplied region is
/// shorter than the encoded form; decoders raise it (or report zero
/// consumed bytes, at the micro-API level) on short input. Both are
/// retriable with a larger buffer or more data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    BufferTooSmall,
    /// A byte width outside 1..=8, or an encoded width byte out of range.
    InvalidWidth,
    /// Checked arithmetic left the 64-bit domain.
    Overflow,
    /// Magic, version, or structural mismatch while deserializing.
    InvalidFormat,
    /// A value does not fit the bit or byte width it was handed to.
    ValueOutOfRange,
    /// An empty buffer or pattern where content is required.
    NullInput,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::BufferTooSmall => "buffer too small",
            ErrorKind::InvalidWidth => "invalid width",
            ErrorKind::Overflow => "arithmetic overflow",
            ErrorKind::InvalidFormat => "invalid format",
            ErrorKind::ValueOutOfRange => "value out of range",
            ErrorKind::NullInput => "null input",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    #[allow(dead_code)]
    inner: DynBacktraceError,
}
pub type Result<T> = std::result::Result<T, Error>;

struct KindErr(ErrorKind, Cow<'static, str>);
impl std::fmt::Debug for KindErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}
impl std::fmt::Display for KindErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}
impl std::error::Error for KindErr {}

impl Error {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(kind: ErrorKind, err: E) -> Error {
        error!(target: "varpack", "{:?}", err);
        let dbe = DynBacktraceError::from(err);
        Error { kind, inner: dbe }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub fn err(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Error {
    let e = KindErr(kind, msg.into());
    Error::new(kind, e)
}

#[test]
fn test_error_kind_roundtrip() {
    let e = err(ErrorKind::BufferTooSmall, "need 9 bytes, have 3");
    assert_eq!(e.kind(), ErrorKind::BufferTooSmall);
    let e = err(ErrorKind::Overflow, "tagged add past u64::MAX");
    assert_eq!(e.kind(), ErrorKind::Overflow);
}
