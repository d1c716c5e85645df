//! Leaf runs: the only nodes that hold bytes

use std::fmt;
use std::io::{self, Write};
use std::ops::Range;
use std::sync::Arc;

use crate::error::WriteError;
use crate::node::Node;

/// A contiguous run of bytes.
///
/// The buffer is shared: slicing a leaf produces a new leaf over a narrower
/// range of the same allocation, never a copy.
#[derive(Clone)]
pub struct Leaf {
    buf: Arc<[u8]>,
    range: Range<usize>,
}

impl Leaf {
    pub(crate) fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        let buf = bytes.into();
        let range = 0..buf.len();
        Self { buf, range }
    }

    /// Leaf over `range` of an existing buffer (range is relative to the buffer)
    fn sub(&self, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end && range.end <= self.buf.len());
        Self {
            buf: Arc::clone(&self.buf),
            range,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.range.clone()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// True when both leaves view the same bytes of the same allocation
    pub fn ptr_eq(&self, other: &Leaf) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf) && self.range == other.range
    }

    // Precondition: start < end
    pub(crate) fn slice(&self, start: usize, end: usize) -> Node {
        debug_assert!(start < end, "slice precondition violated: {start} >= {end}");
        let end = end.min(self.len());
        // Clamping may have destroyed the precondition
        if start >= end {
            return Node::Empty;
        }
        if start == 0 && end == self.len() {
            return Node::Leaf(self.clone());
        }
        let base = self.range.start;
        Node::Leaf(self.sub(base + start..base + end))
    }

    pub(crate) fn drop_prefix(&self, start: usize) -> Node {
        match start {
            0 => Node::Leaf(self.clone()),
            s if s >= self.len() => Node::Empty,
            s => Node::Leaf(self.sub(self.range.start + s..self.range.end)),
        }
    }

    pub(crate) fn drop_postfix(&self, end: usize) -> Node {
        match end {
            0 => Node::Empty,
            e if e >= self.len() => Node::Leaf(self.clone()),
            e => Node::Leaf(self.sub(self.range.start..self.range.start + e)),
        }
    }

    /// One logical write of the whole run, counting what the sink accepted
    pub(crate) fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<u64, WriteError> {
        let mut buf = self.as_bytes();
        let mut written = 0u64;
        while !buf.is_empty() {
            match w.write(buf) {
                Ok(0) => {
                    return Err(WriteError::new(
                        written,
                        io::Error::new(io::ErrorKind::WriteZero, "failed to write whole leaf"),
                    ));
                }
                Ok(n) => {
                    written += n as u64;
                    buf = &buf[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(WriteError::new(written, e)),
            }
        }
        Ok(written)
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Leaf {}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Leaf({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> Leaf {
        Leaf::new(s.as_bytes())
    }

    fn bytes_of(node: &Node) -> Vec<u8> {
        let mut out = Vec::new();
        node.walk_leaves(&mut |l: &Leaf| out.extend_from_slice(l.as_bytes()));
        out
    }

    #[test]
    fn test_slice_clamps_to_content() {
        let l = leaf("hello");
        assert_eq!(bytes_of(&l.slice(1, 3)), b"el");
        assert_eq!(bytes_of(&l.slice(2, 100)), b"llo");
        assert!(l.slice(5, 9).is_empty_node());
        assert!(l.slice(7, 9).is_empty_node());
    }

    #[test]
    fn test_slice_shares_buffer() {
        let l = leaf("hello world");
        let Node::Leaf(sub) = l.slice(6, 11) else {
            panic!("expected leaf");
        };
        assert!(Arc::ptr_eq(&sub.buf, &l.buf));
        assert_eq!(sub.as_bytes(), b"world");

        // Slicing a slice stays relative to the sub-range
        let Node::Leaf(inner) = sub.slice(1, 3) else {
            panic!("expected leaf");
        };
        assert_eq!(inner.as_bytes(), b"or");
    }

    #[test]
    fn test_full_slice_is_same_leaf() {
        let l = leaf("abc");
        let Node::Leaf(same) = l.slice(0, 3) else {
            panic!("expected leaf");
        };
        assert!(same.ptr_eq(&l));
    }

    #[test]
    fn test_drop_prefix() {
        let l = leaf("abcdef");
        assert!(matches!(l.drop_prefix(0), Node::Leaf(ref x) if x.ptr_eq(&l)));
        assert_eq!(bytes_of(&l.drop_prefix(2)), b"cdef");
        assert!(l.drop_prefix(6).is_empty_node());
        assert!(l.drop_prefix(60).is_empty_node());
    }

    #[test]
    fn test_drop_postfix() {
        let l = leaf("abcdef");
        assert!(l.drop_postfix(0).is_empty_node());
        assert_eq!(bytes_of(&l.drop_postfix(4)), b"abcd");
        assert!(matches!(l.drop_postfix(6), Node::Leaf(ref x) if x.ptr_eq(&l)));
    }

    /// Accepts at most `chunk` bytes per call
    struct Trickle {
        out: Vec<u8>,
        chunk: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_retries_short_writes() {
        let l = leaf("abcdefg");
        let mut sink = Trickle {
            out: Vec::new(),
            chunk: 2,
        };
        assert_eq!(l.write_to(&mut sink).unwrap(), 7);
        assert_eq!(sink.out, b"abcdefg");
    }

    #[test]
    fn test_write_zero_is_an_error() {
        let l = leaf("abc");
        let mut sink = Trickle {
            out: Vec::new(),
            chunk: 0,
        };
        let err = l.write_to(&mut sink).unwrap_err();
        assert_eq!(err.written(), 0);
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }
}
