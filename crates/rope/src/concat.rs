//! Concat nodes and the smart constructor that builds them

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::node::Node;

/// Join of two non-empty subtrees.
///
/// Only [`conc`] creates these, so every instance upholds:
/// - neither child is empty
/// - `split` is the exact length of `left`
/// - `height` is one more than the taller child
/// - `right_len`, when known, is the exact length of `right`
pub struct Concat {
    pub(crate) left: Node,
    pub(crate) right: Node,
    /// Length of left subtree (relative index where the halves meet)
    pub(crate) split: usize,
    /// Cached length of right subtree, `None` when it exceeds the cache range.
    /// Right subtrees are never empty, so the niche costs nothing.
    pub(crate) right_len: Option<NonZeroU32>,
    pub(crate) height: u32,
}

/// Concatenate two nodes.
///
/// Length hints that are absent or zero are recomputed from the subtree.
pub fn conc(lhs: Node, rhs: Node, lhs_len: Option<usize>, rhs_len: Option<usize>) -> Node {
    if lhs.is_empty_node() {
        return rhs;
    }
    if rhs.is_empty_node() {
        return lhs;
    }

    let height = 1 + lhs.depth().max(rhs.depth());

    let lhs_len = lhs_len.filter(|&n| n > 0).unwrap_or_else(|| lhs.len());
    let rhs_len = rhs_len.filter(|&n| n > 0).unwrap_or_else(|| rhs.len());
    let right_len = u32::try_from(rhs_len).ok().and_then(NonZeroU32::new);
    if right_len.is_none() {
        tracing::trace!(rhs_len, "right length exceeds cache range, leaving it uncached");
    }

    Node::Concat(Arc::new(Concat {
        left: lhs,
        right: rhs,
        split: lhs_len,
        right_len,
        height,
    }))
}

impl Concat {
    pub fn left(&self) -> &Node {
        &self.left
    }

    pub fn right(&self) -> &Node {
        &self.right
    }

    pub fn split(&self) -> usize {
        self.split
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.split + self.right_len()
    }

    /// Cached right length, or a fresh walk of `right` when uncached.
    /// The cache is never repaired.
    #[inline]
    pub(crate) fn right_len(&self) -> usize {
        match self.right_len {
            Some(n) => n.get() as usize,
            None => self.right.len(),
        }
    }

    fn cached_right_len(&self) -> Option<usize> {
        self.right_len.map(|n| n.get() as usize)
    }

    // Precondition: start < end
    pub(crate) fn slice(self: &Arc<Self>, start: usize, end: usize) -> Node {
        let split = self.split;

        // Only slicing into one side, recurse to that side
        if start > split {
            return self.right.slice(start - split, end - split);
        }
        if end <= split {
            return self.left.slice(start, end);
        }

        let len = split + self.right_len();
        if start == 0 && end >= len {
            return Node::Concat(Arc::clone(self));
        }

        let (left, left_len) = if start > 0 {
            (self.left.slice(start, end), None)
        } else {
            (self.left.clone(), Some(split))
        };

        let (right, right_len) = if end < len {
            (self.right.slice(0, end - split), None)
        } else {
            (self.right.clone(), self.cached_right_len())
        };

        conc(left, right, left_len, right_len)
    }

    pub(crate) fn drop_prefix(self: &Arc<Self>, start: usize) -> Node {
        match start {
            0 => Node::Concat(Arc::clone(self)),
            s if s < self.split => conc(
                self.left.drop_prefix(s),
                self.right.clone(),
                Some(self.split - s),
                self.cached_right_len(),
            ),
            s => self.right.drop_prefix(s - self.split),
        }
    }

    pub(crate) fn drop_postfix(self: &Arc<Self>, end: usize) -> Node {
        match end {
            0 => Node::Empty,
            e if e <= self.split => self.left.drop_postfix(e),
            e if e >= self.len() => Node::Concat(Arc::clone(self)),
            e => {
                let e = e - self.split;
                conc(
                    self.left.clone(),
                    self.right.drop_postfix(e),
                    Some(self.split),
                    Some(e),
                )
            }
        }
    }
}

/// Appending in a loop builds chains as deep as the number of appends, so
/// teardown unlinks uniquely owned children onto a heap stack instead of
/// recursing once per level.
impl Drop for Concat {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_concats(&mut self.left, &mut self.right, &mut pending);
        while let Some(c) = pending.pop() {
            // Subtrees still shared with another version stay alive
            if let Some(mut inner) = Arc::into_inner(c) {
                take_concats(&mut inner.left, &mut inner.right, &mut pending);
            }
        }
    }
}

fn take_concats(left: &mut Node, right: &mut Node, pending: &mut Vec<Arc<Concat>>) {
    for child in [left, right] {
        if let Node::Concat(_) = child {
            if let Node::Concat(c) = std::mem::take(child) {
                pending.push(c);
            }
        }
    }
}
