use std::io;

use thiserror::Error;

/// A sink rejected part of a rope.
///
/// `written` counts every byte the sink accepted before failing, including a
/// partial write from the leaf that failed.
#[derive(Debug, Error)]
#[error("rope write failed after {written} bytes: {source}")]
pub struct WriteError {
    written: u64,
    #[source]
    source: io::Error,
}

impl WriteError {
    pub(crate) fn new(written: u64, source: io::Error) -> Self {
        Self { written, source }
    }

    /// Same failure, with `prior` bytes written by earlier siblings added on
    pub(crate) fn after(self, prior: u64) -> Self {
        Self {
            written: prior + self.written,
            source: self.source,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    pub fn into_inner(self) -> io::Error {
        self.source
    }
}

impl From<WriteError> for io::Error {
    fn from(err: WriteError) -> Self {
        err.source
    }
}

/// Rope content is not valid UTF-8
#[derive(Debug, Error)]
#[error("rope is not valid UTF-8")]
pub struct Utf8Error {
    pub(crate) bytes: Vec<u8>,
}

impl Utf8Error {
    /// The rope's bytes, returned to the caller untouched
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A broken concat invariant, reported by [`Node::validate`](crate::Node::validate)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("concat has an empty child")]
    EmptyChild,
    #[error("split point {split} does not match left length {actual}")]
    Split { split: usize, actual: usize },
    #[error("cached right length {cached} does not match actual {actual}")]
    RightLen { cached: u32, actual: usize },
    #[error("height {height}, expected {expected}")]
    Height { height: u32, expected: u32 },
}
