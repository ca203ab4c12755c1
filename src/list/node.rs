/*!
 * List Node Encoding
 *
 * A node occupies one pool allocation of `NODE_SIZE` bytes:
 *
 * ```text
 *   0      2            8                16
 *   ┌──────┬────────────┬────────────────┐
 *   │ data │  padding   │  next (u64 LE) │
 *   └──────┴────────────┴────────────────┘
 * ```
 */

use super::types::NodeRef;
use crate::core::limits::{NODE_SIZE, WORD_SIZE};
use crate::core::types::PoolPtr;
use crate::memory::{MemoryResult, PoolAllocator};

const DATA_FIELD: usize = 0;
const NEXT_FIELD: usize = WORD_SIZE;
const NO_NEXT: u64 = u64::MAX;

/// Decoded node fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Node {
    pub value: u16,
    pub next: Option<NodeRef>,
}

impl Node {
    fn encode_next(next: Option<NodeRef>) -> [u8; WORD_SIZE] {
        next.map_or(NO_NEXT, |node| node.ptr().offset() as u64).to_le_bytes()
    }

    pub fn encode(&self) -> [u8; NODE_SIZE] {
        let mut bytes = [0u8; NODE_SIZE];
        bytes[DATA_FIELD..DATA_FIELD + 2].copy_from_slice(&self.value.to_le_bytes());
        bytes[NEXT_FIELD..NEXT_FIELD + WORD_SIZE].copy_from_slice(&Self::encode_next(self.next));
        bytes
    }

    pub fn decode(bytes: &[u8; NODE_SIZE]) -> Self {
        let value = u16::from_le_bytes([bytes[DATA_FIELD], bytes[DATA_FIELD + 1]]);
        let mut next = [0u8; WORD_SIZE];
        next.copy_from_slice(&bytes[NEXT_FIELD..NEXT_FIELD + WORD_SIZE]);
        let next = u64::from_le_bytes(next);

        Self {
            value,
            next: (next != NO_NEXT).then(|| NodeRef::new(PoolPtr::new(next as usize))),
        }
    }

    pub fn load(allocator: &PoolAllocator, node: NodeRef) -> MemoryResult<Self> {
        let mut bytes = [0u8; NODE_SIZE];
        allocator.read_into(node.ptr(), 0, &mut bytes)?;
        Ok(Self::decode(&bytes))
    }

    pub fn store(&self, allocator: &PoolAllocator, node: NodeRef) -> MemoryResult<()> {
        allocator.write_bytes(node.ptr(), 0, &self.encode())
    }

    /// Rewrite only the next field of `node`
    pub fn link(
        allocator: &PoolAllocator,
        node: NodeRef,
        next: Option<NodeRef>,
    ) -> MemoryResult<()> {
        allocator.write_bytes(node.ptr(), NEXT_FIELD, &Self::encode_next(next))
    }
}

/// Follows next links from a starting node, yielding each node with its fields
///
/// Stops after the first read error, which it yields.
pub(super) struct Cursor<'a> {
    allocator: &'a PoolAllocator,
    next: Option<NodeRef>,
}

impl<'a> Cursor<'a> {
    pub fn new(allocator: &'a PoolAllocator, start: Option<NodeRef>) -> Self {
        Self {
            allocator,
            next: start,
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = MemoryResult<(NodeRef, Node)>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        match Node::load(self.allocator, current) {
            Ok(node) => {
                self.next = node.next;
                Some(Ok((current, node)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
