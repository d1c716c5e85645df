//! Byte-oriented text queries over a rope (no Unicode indexing)

use std::borrow::Cow;

use bytecount::count as bytecount_count;
use memchr::memchr;
use simdutf8::basic::from_utf8;

use crate::error::Utf8Error;
use crate::node::Node;
use crate::rope::Rope;

impl Rope {
    /// Number of `\n` bytes
    pub fn line_count(&self) -> usize {
        self.chunks().map(|chunk| bytecount_count(chunk, b'\n')).sum()
    }

    /// Offset of the first `target` byte at or after `from`
    pub fn find_byte(&self, target: u8, from: usize) -> Option<usize> {
        let mut offset = 0;
        for chunk in self.chunks() {
            let end = offset + chunk.len();
            if end > from {
                let skip = from.saturating_sub(offset);
                if let Some(pos) = memchr(target, &chunk[skip..]) {
                    return Some(offset + skip + pos);
                }
            }
            offset = end;
        }
        None
    }

    /// Borrowed when the rope is a single valid leaf, otherwise rebuilt
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        match self.node() {
            Node::Empty => Cow::Borrowed(""),
            Node::Leaf(leaf) => String::from_utf8_lossy(leaf.as_bytes()),
            Node::Concat(_) => Cow::Owned(String::from_utf8_lossy(&self.to_vec()).into_owned()),
        }
    }

    /// Linearize and validate as UTF-8
    pub fn into_string(self) -> Result<String, Utf8Error> {
        let bytes = self.to_vec();
        if from_utf8(&bytes).is_err() {
            return Err(Utf8Error { bytes });
        }
        // SAFETY: validated above
        Ok(unsafe { String::from_utf8_unchecked(bytes) })
    }
}
