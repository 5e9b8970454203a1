//! # PATRICIA trie
//!
//! An arena-backed PATRICIA trie mapping bit-string keys to values.
//!
//! Inner nodes carry only the bit positions that actually distinguish
//! stored keys, so lookups, inserts and deletes touch one node per
//! distinguishing bit rather than one per key byte. Keys are anything
//! that exposes bytes via `AsRef<[u8]>`; a per-trie [`KeyLength`]
//! policy decides how many of those bits are significant, which makes
//! the same structure usable for string dictionaries and fixed-width
//! binary keys such as IP addresses.
//!
//! ## Features
//!
//! - **Two deletion styles**: key-driven removal, or O(1) removal
//!   through a [`NodeHandle`] returned by insert
//! - **Prefix resolution**: locate the subtree of all keys sharing a
//!   bit prefix and iterate exactly its entries
//! - **In-order iteration**: parent-pointer driven, no heap allocation
//!   per step, bit-path (lexicographic) order
//! - **Arena storage**: nodes live in a batch-growing slot arena with
//!   a freelist; stale handles are detected, not dereferenced
//!
//! ## Example
//!
//! ```rust
//! use patricia_arena::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert("hello".to_string(), 1);
//! trie.insert("help".to_string(), 2);
//! trie.insert("world".to_string(), 3);
//!
//! assert_eq!(trie.get("hello"), Some(&1));
//!
//! // All keys starting with "hel", in order.
//! let hel: Vec<&String> = trie.iter_prefix("hel", 24).map(|(k, _)| k).collect();
//! assert_eq!(hel, ["hello", "help"]);
//! ```
//!
//! The trie is single-threaded: it takes `&mut self` for mutation and
//! shares through `&self` like any other Rust collection, and
//! iterators borrow the trie for their whole lifetime.

mod arena;
mod bits;
mod iter;
mod keylen;
mod node;
mod trie;

// Re-export public types
pub use crate::arena::NodeHandle;
pub use crate::iter::{Iter, PrefixIter};
pub use crate::keylen::KeyLength;
pub use crate::trie::Trie;

/// Errors that can occur in trie operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The handle's entry has been removed; the handle is no longer
    /// usable.
    StaleHandle,
    /// The handle names a branch point, but the operation needs a leaf.
    NotALeaf,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StaleHandle => write!(f, "handle is stale: its entry was removed"),
            Error::NotALeaf => write!(f, "handle does not refer to a leaf entry"),
        }
    }
}

impl std::error::Error for Error {}
