//! In-order traversal over a trie or a bounded subtree.
//!
//! The walk is driven entirely by parent back-indices: no stack, no
//! revisiting of key bits. From the current leaf it climbs while it is
//! a right child, steps across to the parent's right child, then slides
//! down left children to the next leaf. The subtree root acts as the
//! boundary; climbing to it ends the traversal.

use crate::bits::shares_prefix;
use crate::node::{Node, NodeIdx};
use crate::trie::Trie;

/// In-order iterator over the entries of a [`Trie`] or one of its
/// subtrees.
///
/// Yields `(&K, &V)` in bit-path order. Because the iterator borrows
/// the trie, structural mutation during traversal is a compile error
/// rather than undefined behavior.
pub struct Iter<'a, K, V> {
    trie: &'a Trie<K, V>,
    /// Root of the subtree bounding this traversal.
    bound: Option<NodeIdx>,
    /// The leaf to emit next; `None` once exhausted.
    current: Option<NodeIdx>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(trie: &'a Trie<K, V>, bound: Option<NodeIdx>) -> Self {
        let current = bound.map(|idx| leftmost(trie, idx));
        Iter {
            trie,
            bound,
            current,
        }
    }

    fn is_right_child(&self, idx: NodeIdx) -> bool {
        match self.trie.arena.node(idx).up() {
            Some(up) => match self.trie.arena.node(up) {
                Node::Inner(inner) => inner.child[1] == idx,
                Node::Leaf(_) => unreachable!("parent is always inner"),
            },
            None => false,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let bound = self.bound?;

        let leaf = match self.trie.arena.node(current) {
            Node::Leaf(leaf) => leaf,
            Node::Inner(_) => unreachable!("iterator positions are leaves"),
        };
        let item = (&leaf.key, &leaf.value);

        // Advance. Climb out of exhausted right spines first; if that
        // lands on the boundary the walk is over, otherwise we sit on
        // a left child and the next leaf is leftmost under its
        // parent's right child.
        let mut idx = current;
        if idx != bound && self.is_right_child(idx) {
            loop {
                idx = match self.trie.arena.node(idx).up() {
                    Some(up) => up,
                    None => unreachable!("climb is bounded by the subtree root"),
                };
                if idx == bound || !self.is_right_child(idx) {
                    break;
                }
            }
        }

        if idx == bound {
            self.current = None;
            return Some(item);
        }

        let parent = match self.trie.arena.node(idx).up() {
            Some(up) => up,
            None => unreachable!("non-boundary node has a parent"),
        };
        let right = match self.trie.arena.node(parent) {
            Node::Inner(inner) => inner.child[1],
            Node::Leaf(_) => unreachable!("parent is always inner"),
        };
        self.current = Some(leftmost(self.trie, right));

        Some(item)
    }
}

/// Slides down left children from `idx` to the smallest leaf beneath
/// it.
fn leftmost<K, V>(trie: &Trie<K, V>, mut idx: NodeIdx) -> NodeIdx {
    while let Node::Inner(inner) = trie.arena.node(idx) {
        idx = inner.child[0];
    }
    idx
}

/// Iterator over the entries whose keys share a bit prefix, in
/// bit-path order.
///
/// Wraps a subtree-bounded [`Iter`] and drops entries that do not
/// match the prefix, so a prefix with no matching keys simply yields
/// nothing.
pub struct PrefixIter<'a, K, V> {
    inner: Iter<'a, K, V>,
    prefix: Vec<u8>,
    nbits: u32,
}

impl<'a, K, V> PrefixIter<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>, prefix: Vec<u8>, nbits: u32) -> Self {
        PrefixIter {
            inner,
            prefix,
            nbits,
        }
    }
}

impl<'a, K: AsRef<[u8]>, V> Iterator for PrefixIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = self.inner.next()?;
            let key_bits = self.inner.trie.key_len.bits_of(key.as_ref());
            if shares_prefix(key.as_ref(), key_bits, &self.prefix, self.nbits) {
                return Some((key, value));
            }
        }
    }
}
