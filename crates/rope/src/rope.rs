//! Public document handle over the node tree

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::ops::{Add, AddAssign};

use crate::concat::conc;
use crate::error::WriteError;
use crate::leaf::Leaf;
use crate::node::{Chunks, Node};

/// Persistent byte rope.
///
/// Every edit returns a new rope that shares untouched subtrees with the old
/// one, so keeping older versions around is cheap. Indices are byte offsets.
/// Out-of-range or inverted indices are clamped, never rejected.
#[derive(Clone, Default)]
pub struct Rope {
    root: Node,
}

impl Rope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_node(root: Node) -> Self {
        Self { root }
    }

    pub fn node(&self) -> &Node {
        &self.root
    }

    pub fn into_node(self) -> Node {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty_node()
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Clamp a signed offset into `0..=len`
    fn clamp(&self, index: i64) -> usize {
        usize::try_from(index.max(0)).map_or(self.len(), |i| i.min(self.len()))
    }

    /// Bytes `start..end`. Empty when the clamped range is empty or inverted.
    pub fn slice(&self, start: i64, end: i64) -> Rope {
        let start = self.clamp(start);
        let end = self.clamp(end);
        if start >= end {
            return Rope::new();
        }
        Self::from_node(self.root.slice(start, end))
    }

    /// Everything after the first `start` bytes
    pub fn drop_prefix(&self, start: i64) -> Rope {
        Self::from_node(self.root.drop_prefix(self.clamp(start)))
    }

    /// The first `end` bytes
    pub fn drop_postfix(&self, end: i64) -> Rope {
        Self::from_node(self.root.drop_postfix(self.clamp(end)))
    }

    pub fn concat(&self, other: &Rope) -> Rope {
        Self::from_node(conc(self.root.clone(), other.root.clone(), None, None))
    }

    /// Join many ropes left to right
    pub fn append_all<'a>(&self, others: impl IntoIterator<Item = &'a Rope>) -> Rope {
        others
            .into_iter()
            .fold(self.clone(), |acc, next| acc.concat(next))
    }

    /// Splice `other` in before byte `at`
    pub fn insert(&self, at: i64, other: &Rope) -> Rope {
        let at = self.clamp(at) as i64;
        self.drop_postfix(at)
            .concat(other)
            .concat(&self.drop_prefix(at))
    }

    /// Remove bytes `start..end`; inverted ranges remove nothing
    pub fn delete(&self, start: i64, end: i64) -> Rope {
        self.replace(start, end, &Rope::new())
    }

    /// Replace bytes `start..end` with `other`
    pub fn replace(&self, start: i64, end: i64, other: &Rope) -> Rope {
        let start = self.clamp(start) as i64;
        let end = (self.clamp(end) as i64).max(start);
        self.drop_postfix(start)
            .concat(other)
            .concat(&self.drop_prefix(end))
    }

    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.root.byte_at(index)
    }

    /// Write the whole rope to `w`, see [`Node::write_to`]
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<u64, WriteError> {
        self.root.write_to(w).inspect_err(|err| {
            tracing::debug!(written = err.written(), len = self.len(), "rope write failed: {err}");
        })
    }

    pub fn walk_leaves<F: FnMut(&Leaf)>(&self, mut visit: F) {
        self.root.walk_leaves(&mut visit)
    }

    /// Visit each chunk, stopping at the first error
    pub fn try_walk<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&[u8]) -> Result<(), E>,
    {
        self.chunks().try_for_each(|chunk| visit(chunk))
    }

    pub fn chunks(&self) -> Chunks<'_> {
        self.root.chunks()
    }

    /// Linearize into one contiguous buffer
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        self.walk_leaves(|leaf| out.extend_from_slice(leaf.as_bytes()));
        out
    }

    /// Streaming reader over the rope's bytes
    pub fn reader(&self) -> RopeReader<'_> {
        RopeReader {
            chunks: self.chunks(),
            current: &[],
        }
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Self::from_node(Node::from_bytes(text.as_bytes()))
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Self::from(text.into_bytes())
    }
}

impl From<&[u8]> for Rope {
    fn from(bytes: &[u8]) -> Self {
        Self::from_node(Node::from_bytes(bytes))
    }
}

impl From<Vec<u8>> for Rope {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_node(Node::from_bytes(bytes))
    }
}

impl From<Node> for Rope {
    fn from(root: Node) -> Self {
        Self::from_node(root)
    }
}

impl FromIterator<Rope> for Rope {
    fn from_iter<I: IntoIterator<Item = Rope>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Rope::new(), |acc, next| acc.concat(&next))
    }
}

impl Add for Rope {
    type Output = Rope;

    fn add(self, rhs: Rope) -> Rope {
        Rope::from_node(conc(self.root, rhs.root, None, None))
    }
}

impl Add<&Rope> for &Rope {
    type Output = Rope;

    fn add(self, rhs: &Rope) -> Rope {
        self.concat(rhs)
    }
}

impl AddAssign<&Rope> for Rope {
    fn add_assign(&mut self, rhs: &Rope) {
        let root = std::mem::take(&mut self.root);
        self.root = conc(root, rhs.root.clone(), None, None);
    }
}

/// Lossy UTF-8 rendering; chunks split inside a character are rejoined first
impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Node::Leaf(ref leaf) => f.write_str(&String::from_utf8_lossy(leaf.as_bytes())),
            _ => f.write_str(&String::from_utf8_lossy(&self.to_vec())),
        }
    }
}

impl fmt::Debug for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rope({:?})", self.to_string())
    }
}

/// Content comparison, independent of tree shape
impl Ord for Rope {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.chunks();
        let mut b = other.chunks();
        let mut x: &[u8] = &[];
        let mut y: &[u8] = &[];
        loop {
            if x.is_empty() {
                x = a.next().unwrap_or(&[]);
            }
            if y.is_empty() {
                y = b.next().unwrap_or(&[]);
            }
            match (x.is_empty(), y.is_empty()) {
                (true, true) => return Ordering::Equal,
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                (false, false) => {}
            }
            let n = x.len().min(y.len());
            match x[..n].cmp(&y[..n]) {
                Ordering::Equal => {
                    x = &x[n..];
                    y = &y[n..];
                }
                ord => return ord,
            }
        }
    }
}

impl PartialOrd for Rope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rope {}

impl PartialEq<[u8]> for Rope {
    fn eq(&self, other: &[u8]) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut rest = other;
        self.chunks().all(|chunk| {
            let (head, tail) = rest.split_at(chunk.len());
            rest = tail;
            head == chunk
        })
    }
}

impl PartialEq<str> for Rope {
    fn eq(&self, other: &str) -> bool {
        *self == *other.as_bytes()
    }
}

impl PartialEq<&str> for Rope {
    fn eq(&self, other: &&str) -> bool {
        *self == *other.as_bytes()
    }
}

/// Bytes fed to the hasher per `write` call
const HASH_BLOCK: usize = 64;

/// Hash of the content, independent of tree shape.
///
/// Hashers may treat each `write` as a separate field, so leaves are
/// regrouped into fixed-size blocks before hashing.
impl Hash for Rope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        let mut block = [0u8; HASH_BLOCK];
        let mut filled = 0;
        for mut chunk in self.chunks() {
            while !chunk.is_empty() {
                let n = (HASH_BLOCK - filled).min(chunk.len());
                block[filled..filled + n].copy_from_slice(&chunk[..n]);
                filled += n;
                chunk = &chunk[n..];
                if filled == HASH_BLOCK {
                    state.write(&block);
                    filled = 0;
                }
            }
        }
        state.write(&block[..filled]);
    }
}

/// [`Read`] adapter returned by [`Rope::reader`]
pub struct RopeReader<'a> {
    chunks: Chunks<'a>,
    current: &'a [u8],
}

impl Read for RopeReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.current.is_empty() {
            match self.chunks.next() {
                Some(chunk) => self.current = chunk,
                None => return Ok(0),
            }
        }
        let n = self.current.len().min(buf.len());
        buf[..n].copy_from_slice(&self.current[..n]);
        self.current = &self.current[n..];
        Ok(n)
    }
}
