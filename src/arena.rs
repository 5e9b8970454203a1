//! Batch-allocating node arena.
//!
//! Nodes are stored in a growable vector of slots threaded by an
//! intrusive index freelist. When the freelist runs dry the vector
//! grows by a whole block at a time, amortizing allocation the way the
//! original freelist-of-pnodes scheme did, without reusing raw
//! pointers.
//!
//! Each slot carries a generation counter, bumped whenever the slot is
//! freed. Public handles pair an index with the generation observed at
//! allocation time, so a handle that outlives its entry is detected
//! instead of silently resolving to whatever reused the slot.

use crate::node::{Node, NodeIdx};

/// Number of slots added per refill.
const BLOCK: usize = 1024;

#[derive(Debug)]
enum Entry<K, V> {
    Occupied(Node<K, V>),
    Free { next: Option<NodeIdx> },
}

#[derive(Debug)]
struct Slot<K, V> {
    generation: u32,
    entry: Entry<K, V>,
}

/// A handle to a node previously returned by the trie.
///
/// Handles stay valid until the node they name is removed (or the trie
/// is cleared); after that, operations taking a handle report
/// [`Error::StaleHandle`](crate::Error::StaleHandle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle {
    pub(crate) index: NodeIdx,
    pub(crate) generation: u32,
}

#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<NodeIdx>,
    /// Number of occupied slots.
    live: usize,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Arena {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            live: 0,
        };
        arena.refill(capacity);
        arena
    }

    /// Appends `count` fresh slots and links them into the freelist.
    fn refill(&mut self, count: usize) {
        // A trie of 2^32 nodes would overflow NodeIdx long before this
        // assert fires in practice.
        assert!(self.slots.len() + count <= NodeIdx::MAX as usize);
        for _ in 0..count {
            let idx = self.slots.len() as NodeIdx;
            self.slots.push(Slot {
                generation: 0,
                entry: Entry::Free {
                    next: self.free_head,
                },
            });
            self.free_head = Some(idx);
        }
    }

    /// Stores `node` in a free slot, growing by a block if necessary,
    /// and returns its index.
    pub fn alloc(&mut self, node: Node<K, V>) -> NodeIdx {
        if self.free_head.is_none() {
            self.refill(BLOCK);
        }
        let idx = match self.free_head {
            Some(idx) => idx,
            None => unreachable!("freelist empty after refill"),
        };
        let slot = &mut self.slots[idx as usize];
        match slot.entry {
            Entry::Free { next } => self.free_head = next,
            Entry::Occupied(_) => unreachable!("occupied slot on freelist"),
        }
        slot.entry = Entry::Occupied(node);
        self.live += 1;
        idx
    }

    /// Releases the slot at `idx`, returning the node it held. The
    /// slot's generation is bumped so outstanding handles to it go
    /// stale.
    pub fn free(&mut self, idx: NodeIdx) -> Node<K, V> {
        let slot = &mut self.slots[idx as usize];
        let entry = std::mem::replace(
            &mut slot.entry,
            Entry::Free {
                next: self.free_head,
            },
        );
        match entry {
            Entry::Occupied(node) => {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_head = Some(idx);
                self.live -= 1;
                node
            }
            Entry::Free { .. } => unreachable!("double free of arena slot"),
        }
    }

    /// Borrows the node at `idx`. Internal callers only pass indices
    /// of live nodes.
    pub fn node(&self, idx: NodeIdx) -> &Node<K, V> {
        match &self.slots[idx as usize].entry {
            Entry::Occupied(node) => node,
            Entry::Free { .. } => unreachable!("free slot dereferenced"),
        }
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<K, V> {
        match &mut self.slots[idx as usize].entry {
            Entry::Occupied(node) => node,
            Entry::Free { .. } => unreachable!("free slot dereferenced"),
        }
    }

    /// Builds a handle for a live node.
    pub fn handle(&self, idx: NodeIdx) -> NodeHandle {
        NodeHandle {
            index: idx,
            generation: self.slots[idx as usize].generation,
        }
    }

    /// Resolves a handle, refusing stale ones.
    pub fn get(&self, handle: NodeHandle) -> Option<&Node<K, V>> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        match &slot.entry {
            Entry::Occupied(node) => Some(node),
            Entry::Free { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    /// Frees every occupied slot. Generations keep advancing, so
    /// handles issued before the clear are all stale afterwards.
    pub fn clear(&mut self) {
        for idx in 0..self.slots.len() {
            if let Entry::Occupied(_) = self.slots[idx].entry {
                self.free(idx as NodeIdx);
            }
        }
    }
}
