/*!
 * Pool-Backed Linked List
 *
 * Singly linked list of u16 values. Every node is one pool allocation; the
 * list itself only owns the head reference.
 */

use super::node::{Cursor, Node};
use super::types::{ListError, ListResult, NodeRef};
use crate::core::limits::NODE_SIZE;
use crate::core::types::Size;
use crate::memory::{MemoryResult, PoolAllocator};
use parking_lot::Mutex;
use std::fmt;
use tracing::{debug, warn};

/// Singly linked list whose nodes live in a `PoolAllocator`
///
/// The head is guarded by the list's own mutex, taken before any call into
/// the allocator. Positional operations walk from the head.
pub struct PoolList {
    allocator: PoolAllocator,
    head: Mutex<Option<NodeRef>>,
}

impl PoolList {
    /// Empty list drawing nodes from `allocator`
    pub fn new(allocator: PoolAllocator) -> Self {
        Self {
            allocator,
            head: Mutex::new(None),
        }
    }

    /// Empty list with a private pool of `capacity` bytes
    pub fn with_capacity(capacity: Size) -> ListResult<Self> {
        Ok(Self::new(PoolAllocator::with_capacity(capacity)?))
    }

    pub fn allocator(&self) -> &PoolAllocator {
        &self.allocator
    }

    fn cursor(&self, start: Option<NodeRef>) -> Cursor<'_> {
        Cursor::new(&self.allocator, start)
    }

    /// Allocate and fill a node
    fn create_node(&self, value: u16, next: Option<NodeRef>) -> ListResult<NodeRef> {
        let node = NodeRef::new(self.allocator.alloc(NODE_SIZE)?);
        if let Err(e) = (Node { value, next }).store(&self.allocator, node) {
            self.release_node(node);
            return Err(e.into());
        }
        Ok(node)
    }

    /// Return a node's storage to the pool, logging instead of failing
    fn release_node(&self, node: NodeRef) {
        if let Err(e) = self.allocator.free(node.ptr()) {
            warn!(%node, error = %e, "Failed to release list node");
        }
    }

    /// Link `node` after `prev`, or make it the head; frees `node` on failure
    fn attach(
        &self,
        head: &mut Option<NodeRef>,
        prev: Option<NodeRef>,
        node: NodeRef,
    ) -> ListResult<NodeRef> {
        match prev {
            None => {
                *head = Some(node);
                Ok(node)
            }
            Some(prev) => match Node::link(&self.allocator, prev, Some(node)) {
                Ok(()) => Ok(node),
                Err(e) => {
                    self.release_node(node);
                    Err(e.into())
                }
            },
        }
    }

    /// First node matching `predicate`
    fn find(
        &self,
        head: Option<NodeRef>,
        mut predicate: impl FnMut(NodeRef, &Node) -> bool,
    ) -> MemoryResult<Option<(NodeRef, Node)>> {
        for entry in self.cursor(head) {
            let (node_ref, node) = entry?;
            if predicate(node_ref, &node) {
                return Ok(Some((node_ref, node)));
            }
        }
        Ok(None)
    }

    /// Append `value` at the tail
    pub fn insert(&self, value: u16) -> ListResult<NodeRef> {
        let mut head = self.head.lock();

        let tail = self
            .find(*head, |_, node| node.next.is_none())?
            .map(|(tail, _)| tail);

        let node = self.create_node(value, None)?;
        let node = self.attach(&mut head, tail, node)?;
        debug!(value, %node, "Inserted at tail");
        Ok(node)
    }

    /// Insert `value` right after `anchor`
    pub fn insert_after(&self, anchor: NodeRef, value: u16) -> ListResult<NodeRef> {
        let mut head = self.head.lock();

        let Some((_, anchor_node)) = self.find(*head, |node_ref, _| node_ref == anchor)? else {
            warn!(%anchor, "Anchor node is not present in the list");
            return Err(ListError::NotFound);
        };

        let node = self.create_node(value, anchor_node.next)?;
        let node = self.attach(&mut head, Some(anchor), node)?;
        debug!(value, %anchor, %node, "Inserted after anchor");
        Ok(node)
    }

    /// Insert `value` right before `anchor`
    ///
    /// The node is allocated before the anchor is located; if the anchor is
    /// missing that node is freed again and `NotFound` is returned.
    pub fn insert_before(&self, anchor: NodeRef, value: u16) -> ListResult<NodeRef> {
        let mut head = self.head.lock();
        let node = self.create_node(value, Some(anchor))?;

        if *head == Some(anchor) {
            *head = Some(node);
            debug!(value, %anchor, %node, "Inserted before head");
            return Ok(node);
        }

        let prev = match self.find(*head, |_, current| current.next == Some(anchor)) {
            Ok(Some((prev, _))) => prev,
            Ok(None) => {
                warn!(%anchor, "Anchor node is not present in the list");
                self.release_node(node);
                return Err(ListError::NotFound);
            }
            Err(e) => {
                self.release_node(node);
                return Err(e.into());
            }
        };

        let node = self.attach(&mut head, Some(prev), node)?;
        debug!(value, %anchor, %node, "Inserted before anchor");
        Ok(node)
    }

    /// Remove the first node holding `value`
    pub fn delete(&self, value: u16) -> ListResult<()> {
        let mut head = self.head.lock();
        if head.is_none() {
            return Err(ListError::EmptyList);
        }

        let mut prev = None;
        for entry in self.cursor(*head) {
            let (node_ref, node) = entry?;
            if node.value == value {
                match prev {
                    None => *head = node.next,
                    Some(prev) => Node::link(&self.allocator, prev, node.next)?,
                }
                self.allocator.free(node_ref.ptr())?;
                debug!(value, node = %node_ref, "Deleted node");
                return Ok(());
            }
            prev = Some(node_ref);
        }

        Err(ListError::ValueNotFound(value))
    }

    /// First node holding `value`
    pub fn search(&self, value: u16) -> ListResult<Option<NodeRef>> {
        let head = self.head.lock();
        Ok(self
            .find(*head, |_, node| node.value == value)?
            .map(|(node_ref, _)| node_ref))
    }

    /// Payload stored in `node`
    pub fn value(&self, node: NodeRef) -> ListResult<u16> {
        let _head = self.head.lock();
        Ok(Node::load(&self.allocator, node)?.value)
    }

    pub fn count(&self) -> ListResult<usize> {
        let head = self.head.lock();
        let mut count = 0;
        for entry in self.cursor(*head) {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> bool {
        self.head.lock().is_none()
    }

    /// All values from head to tail
    pub fn values(&self) -> ListResult<Vec<u16>> {
        let head = self.head.lock();
        self.cursor(*head)
            .map(|entry| entry.map(|(_, node)| node.value).map_err(ListError::from))
            .collect()
    }

    /// Render the nodes from `start` through `end`, both inclusive
    ///
    /// `None` for `start` means the head; `None` for `end` means the tail.
    /// If `start` is not in the list the result is `[]`.
    pub fn display_range(
        &self,
        start: Option<NodeRef>,
        end: Option<NodeRef>,
    ) -> ListResult<String> {
        let head = self.head.lock();
        let mut in_range = start.is_none();
        let mut rendered = Vec::new();

        for entry in self.cursor(*head) {
            let (node_ref, node) = entry?;
            if Some(node_ref) == start {
                in_range = true;
            }
            if in_range {
                rendered.push(node.value.to_string());
                if Some(node_ref) == end {
                    break;
                }
            }
        }

        Ok(format!("[{}]", rendered.join(", ")))
    }

    /// Free every node and leave the list empty
    ///
    /// Returns the number of nodes released.
    pub fn cleanup(&self) -> ListResult<usize> {
        let mut head = self.head.lock();
        let mut current = head.take();
        let mut released = 0;

        while let Some(node_ref) = current {
            let node = match Node::load(&self.allocator, node_ref) {
                Ok(node) => node,
                Err(e) => {
                    *head = Some(node_ref);
                    return Err(e.into());
                }
            };
            if let Err(e) = self.allocator.free(node_ref.ptr()) {
                *head = Some(node_ref);
                return Err(e.into());
            }
            current = node.next;
            released += 1;
        }

        debug!(released, "List cleaned up");
        Ok(released)
    }
}

impl fmt::Display for PoolList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values().map_err(|_| fmt::Error)?;
        write!(f, "[")?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for PoolList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolList")
            .field("head", &*self.head.lock())
            .field("allocator", &self.allocator)
            .finish()
    }
}

impl Drop for PoolList {
    fn drop(&mut self) {
        if self.head.get_mut().is_some() {
            if let Err(e) = self.cleanup() {
                debug!(error = %e, "List nodes not released on drop");
            }
        }
    }
}
