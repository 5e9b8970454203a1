//! Internal node model for the trie.
//!
//! Nodes live in the arena and refer to each other by slot index. A
//! leaf owns its key and value; an inner node holds the branch bit and
//! its two children (index 0 for bit value 0, index 1 for bit value 1).
//! Every non-root node keeps a parent back-index so the iterator can
//! climb without an auxiliary stack. Back-indices are relations for
//! lookup only; ownership always flows parent to child.

/// Index of a node slot within the arena.
pub(crate) type NodeIdx = u32;

/// Leaf node: a stored entry.
#[derive(Debug)]
pub(crate) struct LeafNode<K, V> {
    pub key: K,
    /// Bit length of `key` under the trie's key-length policy, cached
    /// at insertion time.
    pub key_bits: u32,
    pub value: V,
    pub up: Option<NodeIdx>,
}

/// Inner node: a branch point at `bit`.
#[derive(Debug)]
pub(crate) struct InnerNode {
    /// Branch bit, 1-based from the MSB. Strictly increases on every
    /// root-to-leaf path.
    pub bit: u32,
    /// Children: `child[0]` holds keys with the branch bit clear,
    /// `child[1]` keys with it set.
    pub child: [NodeIdx; 2],
    pub up: Option<NodeIdx>,
}

#[derive(Debug)]
pub(crate) enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Inner(InnerNode),
}

impl<K, V> Node<K, V> {
    pub fn up(&self) -> Option<NodeIdx> {
        match self {
            Node::Leaf(leaf) => leaf.up,
            Node::Inner(inner) => inner.up,
        }
    }

    pub fn set_up(&mut self, up: Option<NodeIdx>) {
        match self {
            Node::Leaf(leaf) => leaf.up = up,
            Node::Inner(inner) => inner.up = up,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Inner(_) => None,
        }
    }

    pub fn as_inner(&self) -> Option<&InnerNode> {
        match self {
            Node::Inner(inner) => Some(inner),
            Node::Leaf(_) => None,
        }
    }
}
