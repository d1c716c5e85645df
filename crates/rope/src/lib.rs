//! Persistent byte rope with structural sharing
//!
//! A rope is an immutable binary tree of shared byte runs. Concatenation,
//! slicing and trimming rebuild only the nodes along the cut and share every
//! other subtree with the source, so older versions stay alive for free.
//!
//! ```
//! use tiny_rope::Rope;
//!
//! let doc = Rope::from("123") + Rope::from("456");
//! assert_eq!(doc.len(), 6);
//! assert_eq!(doc.slice(2, 6), "3456");
//! assert_eq!(doc.drop_prefix(3), "456");
//! ```

mod concat;
mod error;
mod leaf;
mod node;
mod rope;
mod text;

pub use concat::{conc, Concat};
pub use error::{Utf8Error, Violation, WriteError};
pub use leaf::Leaf;
pub use node::{Chunks, Node};
pub use rope::{Rope, RopeReader};
