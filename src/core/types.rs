/*!
 * Core Types
 * Common types used across the allocator and its clients
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset into the backing pool
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Handle to a usable region inside the pool
///
/// A `PoolPtr` is an offset, not a machine pointer. It only becomes meaningful
/// when handed back to the allocator that produced it, which validates it
/// against the live descriptor chain before touching any byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolPtr(Address);

impl PoolPtr {
    /// Result of a zero-byte allocation. Never dereferenceable, never freeable.
    pub const EMPTY: PoolPtr = PoolPtr(Address::MAX);

    #[inline]
    pub const fn new(offset: Address) -> Self {
        Self(offset)
    }

    /// Offset of the usable region from the start of the pool
    #[inline]
    pub const fn offset(self) -> Address {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Address::MAX
    }
}

impl fmt::Display for PoolPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "EMPTY")
        } else {
            write!(f, "0x{:x}", self.0)
        }
    }
}

/// Round `size` up to the allocator's alignment unit
#[inline]
pub const fn align_up(size: Size) -> Size {
    let mask = super::limits::ALIGNMENT - 1;
    (size + mask) & !mask
}
