//! Tree nodes: a closed set of variants dispatched by pattern matching

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::concat::Concat;
use crate::error::{Violation, WriteError};
use crate::leaf::Leaf;

/// Immutable rope node. Cloning is cheap; subtrees are shared, never copied.
#[derive(Clone, Default)]
pub enum Node {
    /// Zero-length identity, never nested inside a concat
    #[default]
    Empty,
    Leaf(Leaf),
    Concat(Arc<Concat>),
}

impl Node {
    /// Single leaf over `bytes`, or `Empty` when there are none
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        let leaf = Leaf::new(bytes);
        if leaf.is_empty() {
            Node::Empty
        } else {
            Node::Leaf(leaf)
        }
    }

    #[inline]
    pub fn is_empty_node(&self) -> bool {
        matches!(self, Node::Empty)
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Node::Empty => 0,
            Node::Leaf(leaf) => leaf.len(),
            Node::Concat(c) => c.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        match self {
            Node::Empty | Node::Leaf(_) => 0,
            Node::Concat(c) => c.height,
        }
    }

    /// Bytes `start..end`, clamped to the node.
    ///
    /// Callers must pass `start < end`; release builds return `Empty` otherwise.
    pub fn slice(&self, start: usize, end: usize) -> Node {
        debug_assert!(start < end, "slice precondition violated: {start} >= {end}");
        if start >= end {
            return Node::Empty;
        }
        match self {
            Node::Empty => Node::Empty,
            Node::Leaf(leaf) => leaf.slice(start, end),
            Node::Concat(c) => c.slice(start, end),
        }
    }

    /// Everything after the first `start` bytes
    pub fn drop_prefix(&self, start: usize) -> Node {
        match self {
            Node::Empty => Node::Empty,
            Node::Leaf(leaf) => leaf.drop_prefix(start),
            Node::Concat(c) => c.drop_prefix(start),
        }
    }

    /// The first `end` bytes
    pub fn drop_postfix(&self, end: usize) -> Node {
        match self {
            Node::Empty => Node::Empty,
            Node::Leaf(leaf) => leaf.drop_postfix(end),
            Node::Concat(c) => c.drop_postfix(end),
        }
    }

    /// Write every byte left to right.
    ///
    /// The first failing leaf stops the walk, so nothing to its right is
    /// attempted. The error reports every byte that reached the sink, which
    /// is the left side's total plus whatever the failing side got through.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<u64, WriteError> {
        let mut written = 0;
        for leaf in self.leaves() {
            match leaf.write_to(w) {
                Ok(n) => written += n,
                Err(e) => return Err(e.after(written)),
            }
        }
        Ok(written)
    }

    /// Visit each leaf in document order
    pub fn walk_leaves<F: FnMut(&Leaf)>(&self, visit: &mut F) {
        self.leaves().for_each(visit);
    }

    fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Leaf contents in document order, without recursion
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks {
            leaves: self.leaves(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.walk_leaves(&mut |_: &Leaf| count += 1);
        count
    }

    /// Byte at `index`, found by descending split points
    pub fn byte_at(&self, mut index: usize) -> Option<u8> {
        let mut node = self;
        loop {
            match node {
                Node::Empty => return None,
                Node::Leaf(leaf) => return leaf.as_bytes().get(index).copied(),
                Node::Concat(c) if index < c.split => node = &c.left,
                Node::Concat(c) => {
                    index -= c.split;
                    node = &c.right;
                }
            }
        }
    }

    /// Identity, not content: true only when both handles share the same node
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Empty, Node::Empty) => true,
            (Node::Leaf(a), Node::Leaf(b)) => a.ptr_eq(b),
            (Node::Concat(a), Node::Concat(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Check every concat below this node, returning the first broken invariant
    pub fn validate(&self) -> Result<(), Violation> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let Node::Concat(c) = node else {
                continue;
            };

            if c.left.is_empty() || c.right.is_empty() {
                return Err(Violation::EmptyChild);
            }
            let left_len = c.left.len();
            if c.split != left_len {
                return Err(Violation::Split {
                    split: c.split,
                    actual: left_len,
                });
            }
            if let Some(cached) = c.right_len {
                let actual = c.right.len();
                if cached.get() as usize != actual {
                    return Err(Violation::RightLen {
                        cached: cached.get(),
                        actual,
                    });
                }
            }
            let expected = 1 + c.left.depth().max(c.right.depth());
            if c.height != expected {
                return Err(Violation::Height {
                    height: c.height,
                    expected,
                });
            }

            stack.push(&c.right);
            stack.push(&c.left);
        }
        Ok(())
    }
}

/// Structural equality: same shape, same split points, same leaf bytes
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Empty, Node::Empty) => true,
            (Node::Leaf(a), Node::Leaf(b)) => a == b,
            (Node::Concat(a), Node::Concat(b)) => {
                Arc::ptr_eq(a, b) || (a.split == b.split && a.left == b.left && a.right == b.right)
            }
            _ => false,
        }
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Empty => f.write_str("Empty"),
            Node::Leaf(leaf) => fmt::Debug::fmt(leaf, f),
            Node::Concat(c) => f
                .debug_struct("Concat")
                .field("split", &c.split)
                .field("height", &c.height)
                .field("left", &c.left)
                .field("right", &c.right)
                .finish(),
        }
    }
}

/// Leaves in document order, walked with an explicit stack
struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Leaf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Empty => {}
                Node::Leaf(leaf) => return Some(leaf),
                Node::Concat(c) => {
                    self.stack.push(&c.right);
                    self.stack.push(&c.left);
                }
            }
        }
        None
    }
}

/// Iterator over leaf contents, see [`Node::chunks`]
pub struct Chunks<'a> {
    leaves: Leaves<'a>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.leaves.next().map(Leaf::as_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concat::conc;

    fn leaf(s: &str) -> Node {
        Node::from_bytes(s.as_bytes())
    }

    #[test]
    fn test_empty_input_is_empty_node() {
        assert!(leaf("").is_empty_node());
        assert_eq!(Node::default().len(), 0);
        assert_eq!(Node::Empty.depth(), 0);
    }

    #[test]
    fn test_walk_leaves_in_order() {
        let lhs = leaf("123");
        let rhs = leaf("456");
        let tree = conc(lhs.clone(), rhs.clone(), None, None);

        let mut seen = Vec::new();
        tree.walk_leaves(&mut |l: &Leaf| seen.push(l.clone()));
        assert_eq!(seen.len(), 2);
        assert!(Node::Leaf(seen[0].clone()).ptr_eq(&lhs));
        assert!(Node::Leaf(seen[1].clone()).ptr_eq(&rhs));

        let mut calls = 0;
        Node::Empty.walk_leaves(&mut |_: &Leaf| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_chunks_match_walk() {
        let tree = conc(
            conc(leaf("a"), leaf("bc"), None, None),
            conc(leaf("def"), leaf("g"), None, None),
            None,
            None,
        );
        let chunks: Vec<&[u8]> = tree.chunks().collect();
        assert_eq!(chunks, vec![&b"a"[..], &b"bc"[..], &b"def"[..], &b"g"[..]]);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(Node::Empty.chunks().count(), 0);
    }

    #[test]
    fn test_byte_at() {
        let tree = conc(leaf("ab"), conc(leaf("cd"), leaf("e"), None, None), None, None);
        let all: Vec<u8> = (0..5).filter_map(|i| tree.byte_at(i)).collect();
        assert_eq!(all, b"abcde");
        assert_eq!(tree.byte_at(5), None);
        assert_eq!(Node::Empty.byte_at(0), None);
    }

    #[test]
    fn test_structural_eq_ignores_buffers() {
        let a = conc(leaf("12"), leaf("34"), None, None);
        let b = conc(leaf("12"), leaf("34"), None, None);
        let c = conc(leaf("1"), leaf("234"), None, None);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn test_validate_catches_bad_split() {
        let bad = Node::Concat(Arc::new(Concat {
            left: leaf("abc"),
            right: leaf("d"),
            split: 2,
            right_len: None,
            height: 1,
        }));
        assert_eq!(
            bad.validate(),
            Err(Violation::Split {
                split: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_validate_catches_empty_child() {
        let bad = Node::Concat(Arc::new(Concat {
            left: Node::Empty,
            right: leaf("d"),
            split: 0,
            right_len: None,
            height: 1,
        }));
        assert_eq!(bad.validate(), Err(Violation::EmptyChild));
    }
}
