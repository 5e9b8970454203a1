//! The main trie implementation.
//!
//! This module contains the `Trie` type, which provides the primary API
//! for working with the PATRICIA trie data structure.

use crate::arena::{Arena, NodeHandle};
use crate::bits::{bit_at, first_diff_bit, keys_equal, KeyDiff};
use crate::iter::{Iter, PrefixIter};
use crate::keylen::KeyLength;
use crate::node::{InnerNode, LeafNode, Node, NodeIdx};
use crate::Error;

/// A PATRICIA trie mapping bit-string keys to values.
///
/// Keys supply their bytes through `AsRef<[u8]>`; how many of those
/// bits are significant is decided by the trie's [`KeyLength`] policy.
/// Inner nodes exist only at bit positions that actually distinguish
/// stored keys, so descent length is bounded by the number of stored
/// keys, not by key length.
///
/// All nodes live in a batch-growing arena owned by the trie. Inserts
/// hand back a [`NodeHandle`] that can later be used for O(1) removal
/// via [`remove_handle`](Trie::remove_handle); handles go stale once
/// their entry is removed and are then rejected, never dereferenced.
///
/// # Examples
///
/// ```
/// use patricia_arena::Trie;
///
/// let mut trie = Trie::new();
/// trie.insert("hello".to_string(), 1);
/// trie.insert("world".to_string(), 2);
///
/// assert_eq!(trie.get("hello"), Some(&1));
/// assert_eq!(trie.len(), 2);
/// ```
#[derive(Debug)]
pub struct Trie<K, V> {
    pub(crate) arena: Arena<K, V>,

    /// The root node of the trie, absent when empty.
    pub(crate) root: Option<NodeIdx>,

    /// The number of entries stored in the trie.
    size: usize,

    pub(crate) key_len: KeyLength,
}

/// Where the splice point hangs in the tree.
enum Link {
    Root,
    Child(NodeIdx, usize),
}

impl<K, V> Trie<K, V> {
    /// Creates a new, empty trie with the default byte-length key
    /// policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use patricia_arena::Trie;
    ///
    /// let trie = Trie::<String, i32>::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_key_length(KeyLength::ByteLength)
    }

    /// Creates an empty trie with the given key-length policy.
    pub fn with_key_length(key_len: KeyLength) -> Self {
        Trie {
            arena: Arena::new(),
            root: None,
            size: 0,
            key_len,
        }
    }

    /// Creates an empty trie with node slots preallocated for roughly
    /// `capacity` entries.
    pub fn with_capacity(capacity: usize, key_len: KeyLength) -> Self {
        Trie {
            // Each entry past the first costs a leaf and an inner node.
            arena: Arena::with_capacity(capacity.saturating_mul(2)),
            root: None,
            size: 0,
            key_len,
        }
    }

    /// Returns the number of entries stored in the trie.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the trie contains no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Removes every entry, releasing all nodes. Handles issued before
    /// the clear are stale afterwards.
    pub fn clear(&mut self) {
        self.arena.clear();
        debug_assert_eq!(self.arena.len(), 0);
        self.root = None;
        self.size = 0;
    }
}

impl<K: AsRef<[u8]>, V> Trie<K, V> {
    /// Inserts a key-value pair, returning a handle to the new leaf.
    ///
    /// If an equal key is already present the trie is left untouched
    /// and `None` is returned: the first value wins. Overwriting is
    /// deliberately not part of this operation.
    ///
    /// Keys that agree except for trailing zero bytes (under the
    /// trie's key-length policy) are bitwise indistinguishable and
    /// count as duplicates of each other; see
    /// [`KeyLength`](crate::KeyLength).
    ///
    /// # Examples
    ///
    /// ```
    /// use patricia_arena::Trie;
    ///
    /// let mut trie = Trie::new();
    /// assert!(trie.insert("hello".to_string(), 1).is_some());
    /// assert!(trie.insert("hello".to_string(), 2).is_none());
    /// assert_eq!(trie.get("hello"), Some(&1));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<NodeHandle> {
        let key_bits = self.key_len.bits_of(key.as_ref());

        let root = match self.root {
            Some(root) => root,
            None => {
                let idx = self.arena.alloc(Node::Leaf(LeafNode {
                    key,
                    key_bits,
                    value,
                    up: None,
                }));
                self.root = Some(idx);
                self.size = 1;
                return Some(self.arena.handle(idx));
            }
        };

        // First descent: find the candidate leaf this key would share
        // a path with, then see where the two first disagree.
        let candidate = self.descend(root, key.as_ref(), key_bits);
        let diff = {
            let leaf = match self.arena.node(candidate) {
                Node::Leaf(leaf) => leaf,
                Node::Inner(_) => unreachable!("descent ends at a leaf"),
            };
            first_diff_bit(key.as_ref(), key_bits, leaf.key.as_ref(), leaf.key_bits)
        };
        let (diff_bit, first_has_one) = match diff {
            KeyDiff::Equal => return None, // duplicate
            KeyDiff::Differs { bit, first_has_one } => (bit, first_has_one),
        };

        // Second descent: branch bits increase with depth, so the
        // first node whose bit exceeds the diff bit (or the leaf we
        // fall off at) is exactly where the new branch belongs.
        let mut link = Link::Root;
        let mut stop = root;
        while let Node::Inner(inner) = self.arena.node(stop) {
            if inner.bit > diff_bit {
                break;
            }
            let side = bit_at(key.as_ref(), key_bits, inner.bit);
            link = Link::Child(stop, side);
            stop = inner.child[side];
        }

        // Splice a new branch point above `stop`. The direction flag
        // from the key comparison alone decides which side the new
        // leaf takes.
        let stop_up = self.arena.node(stop).up();
        let new_leaf = self.arena.alloc(Node::Leaf(LeafNode {
            key,
            key_bits,
            value,
            up: None,
        }));
        let new_side = first_has_one as usize;
        let mut child = [new_leaf; 2];
        child[new_side ^ 1] = stop;
        let new_inner = self.arena.alloc(Node::Inner(InnerNode {
            bit: diff_bit,
            child,
            up: stop_up,
        }));
        self.arena.node_mut(new_leaf).set_up(Some(new_inner));
        self.arena.node_mut(stop).set_up(Some(new_inner));
        match link {
            Link::Root => self.root = Some(new_inner),
            Link::Child(parent, side) => match self.arena.node_mut(parent) {
                Node::Inner(inner) => inner.child[side] = new_inner,
                Node::Leaf(_) => unreachable!("splice parent is always inner"),
            },
        }
        self.size += 1;
        Some(self.arena.handle(new_leaf))
    }

    /// Retrieves a reference to the value stored for the given key, if
    /// any.
    ///
    /// # Examples
    ///
    /// ```
    /// use patricia_arena::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(trie.get("hello"), Some(&42));
    /// assert_eq!(trie.get("world"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let root = self.root?;
        let key = key.as_ref();
        let key_bits = self.key_len.bits_of(key);
        let leaf_idx = self.descend(root, key, key_bits);
        let leaf = self.arena.node(leaf_idx).as_leaf()?;
        if keys_equal(key, key_bits, leaf.key.as_ref(), leaf.key_bits) {
            Some(&leaf.value)
        } else {
            None
        }
    }

    /// Retrieves a mutable reference to the value stored for the given
    /// key, if any.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let root = self.root?;
        let key = key.as_ref();
        let key_bits = self.key_len.bits_of(key);
        let leaf_idx = self.descend(root, key, key_bits);
        match self.arena.node_mut(leaf_idx) {
            Node::Leaf(leaf) if keys_equal(key, key_bits, leaf.key.as_ref(), leaf.key_bits) => {
                Some(&mut leaf.value)
            }
            _ => None,
        }
    }

    /// Returns `true` if the trie contains a value for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes the entry for the given key, returning its value.
    /// Absent keys are a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use patricia_arena::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(trie.remove("hello"), Some(42));
    /// assert_eq!(trie.remove("hello"), None);
    /// assert!(trie.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let root = self.root?;
        let key = key.as_ref();
        let key_bits = self.key_len.bits_of(key);
        let (replacement, removed) = self.remove_at(root, key, key_bits);
        self.root = replacement;
        removed
    }

    // Recursive helper for remove. Returns the node that should take
    // this slot in the parent (None once the subtree is empty) and the
    // removed value, if any.
    fn remove_at(&mut self, idx: NodeIdx, key: &[u8], key_bits: u32) -> (Option<NodeIdx>, Option<V>) {
        enum Step {
            Branch { side: usize, child: NodeIdx },
            Hit,
            Miss,
        }
        let step = match self.arena.node(idx) {
            Node::Inner(inner) => {
                let side = bit_at(key, key_bits, inner.bit);
                Step::Branch {
                    side,
                    child: inner.child[side],
                }
            }
            Node::Leaf(leaf) => {
                if keys_equal(key, key_bits, leaf.key.as_ref(), leaf.key_bits) {
                    Step::Hit
                } else {
                    Step::Miss
                }
            }
        };

        match step {
            Step::Branch { side, child } => {
                let (replacement, removed) = self.remove_at(child, key, key_bits);
                match replacement {
                    Some(new_child) => {
                        if let Node::Inner(inner) = self.arena.node_mut(idx) {
                            inner.child[side] = new_child;
                        }
                        (Some(idx), removed)
                    }
                    None => {
                        // One child gone makes this branch point
                        // redundant: splice the sibling into its place.
                        let (sibling, up) = match self.arena.node(idx) {
                            Node::Inner(inner) => (inner.child[side ^ 1], inner.up),
                            Node::Leaf(_) => unreachable!(),
                        };
                        self.arena.node_mut(sibling).set_up(up);
                        self.arena.free(idx);
                        (Some(sibling), removed)
                    }
                }
            }
            Step::Hit => {
                let node = self.arena.free(idx);
                self.size -= 1;
                match node {
                    Node::Leaf(leaf) => (None, Some(leaf.value)),
                    Node::Inner(_) => unreachable!(),
                }
            }
            Step::Miss => (Some(idx), None),
        }
    }

    /// Removes the entry a handle points at without searching,
    /// returning the key and value.
    ///
    /// The handle must name a leaf that is still present: a handle
    /// whose entry was removed (or whose trie was cleared) yields
    /// [`Error::StaleHandle`], and a subtree handle obtained from
    /// [`resolve_prefix`](Trie::resolve_prefix) that names a branch
    /// point yields [`Error::NotALeaf`]. The trie is untouched in both
    /// cases.
    pub fn remove_handle(&mut self, handle: NodeHandle) -> Result<(K, V), Error> {
        let node = self.arena.get(handle).ok_or(Error::StaleHandle)?;
        let leaf = node.as_leaf().ok_or(Error::NotALeaf)?;
        let up = leaf.up;
        let leaf_idx = handle.index;

        let parent_idx = match up {
            None => {
                // The trie is a single leaf.
                let node = self.arena.free(leaf_idx);
                self.root = None;
                self.size -= 1;
                return match node {
                    Node::Leaf(leaf) => Ok((leaf.key, leaf.value)),
                    Node::Inner(_) => unreachable!(),
                };
            }
            Some(parent_idx) => parent_idx,
        };

        let (sibling, grand) = match self.arena.node(parent_idx) {
            Node::Inner(inner) => {
                let side = if inner.child[0] == leaf_idx { 0 } else { 1 };
                (inner.child[side ^ 1], inner.up)
            }
            Node::Leaf(_) => unreachable!("leaf parent is always inner"),
        };

        // The sibling takes the parent's place under the grandparent.
        self.arena.node_mut(sibling).set_up(grand);
        match grand {
            Some(grand_idx) => match self.arena.node_mut(grand_idx) {
                Node::Inner(inner) => {
                    let side = if inner.child[0] == parent_idx { 0 } else { 1 };
                    inner.child[side] = sibling;
                }
                Node::Leaf(_) => unreachable!(),
            },
            None => self.root = Some(sibling),
        }

        self.arena.free(parent_idx);
        let node = self.arena.free(leaf_idx);
        self.size -= 1;
        match node {
            Node::Leaf(leaf) => Ok((leaf.key, leaf.value)),
            Node::Inner(_) => unreachable!(),
        }
    }

    /// Locates the subtree containing every key that shares the first
    /// `nbits` bits of `prefix`.
    ///
    /// Returns `None` only on an empty trie. When no stored key shares
    /// the prefix the returned handle names the nearest enclosing
    /// node; use [`iter_prefix`](Trie::iter_prefix) to get exactly the
    /// matching entries.
    ///
    /// The prefix's own bit length is taken from the trie's key-length
    /// policy, so with a [`KeyLength::Fixed`] trie the prefix buffer
    /// must be key-sized (e.g. `192.168.2.0` for a /23 query).
    pub fn resolve_prefix<Q>(&self, prefix: &Q, nbits: u32) -> Option<NodeHandle>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let root = self.root?;
        let prefix = prefix.as_ref();
        let prefix_bits = self.key_len.bits_of(prefix);

        let mut idx = self.descend(root, prefix, prefix_bits);
        let walk_up = {
            let leaf = match self.arena.node(idx) {
                Node::Leaf(leaf) => leaf,
                Node::Inner(_) => unreachable!("descent ends at a leaf"),
            };
            match first_diff_bit(prefix, prefix_bits, leaf.key.as_ref(), leaf.key_bits) {
                KeyDiff::Equal => true,
                KeyDiff::Differs { bit, .. } => bit > nbits,
            }
        };

        // Every branch bit above nbits only distinguishes keys inside
        // the shared prefix, so climb while that holds.
        if walk_up {
            while let Some(up) = self.arena.node(idx).up() {
                match self.arena.node(up).as_inner() {
                    Some(inner) if inner.bit > nbits => idx = up,
                    _ => break,
                }
            }
        }

        Some(self.arena.handle(idx))
    }

    /// Returns an in-order iterator over all entries.
    ///
    /// Entries come out in bit-path order, which for byte-string keys
    /// is lexicographic order. The iterator borrows the trie, so
    /// mutating during traversal is rejected at compile time.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self, self.root)
    }

    /// Returns an in-order iterator bounded to the subtree a handle
    /// names, as returned by [`resolve_prefix`](Trie::resolve_prefix)
    /// or [`insert`](Trie::insert).
    pub fn iter_at(&self, handle: NodeHandle) -> Result<Iter<'_, K, V>, Error> {
        match self.arena.get(handle) {
            Some(_) => Ok(Iter::new(self, Some(handle.index))),
            None => Err(Error::StaleHandle),
        }
    }

    /// Returns an iterator over exactly the entries whose keys share
    /// the first `nbits` bits of `prefix`, in bit-path order.
    ///
    /// # Examples
    ///
    /// ```
    /// use patricia_arena::Trie;
    ///
    /// let mut trie = Trie::new();
    /// for key in &["aa", "ab", "aac", "b"] {
    ///     trie.insert(key.to_string(), ());
    /// }
    ///
    /// let keys: Vec<&String> = trie.iter_prefix("a", 8).map(|(k, _)| k).collect();
    /// assert_eq!(keys, ["aa", "aac", "ab"]);
    /// ```
    pub fn iter_prefix<Q>(&self, prefix: &Q, nbits: u32) -> PrefixIter<'_, K, V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let subtree = self.resolve_prefix(prefix, nbits).map(|h| h.index);
        PrefixIter::new(Iter::new(self, subtree), prefix.as_ref().to_vec(), nbits)
    }

    // Follows the key's bits from `idx` down to a leaf.
    fn descend(&self, mut idx: NodeIdx, key: &[u8], key_bits: u32) -> NodeIdx {
        while let Node::Inner(inner) = self.arena.node(idx) {
            idx = inner.child[bit_at(key, key_bits, inner.bit)];
        }
        idx
    }
}

impl<K, V> Default for Trie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K: AsRef<[u8]>, V> IntoIterator for &'a Trie<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
