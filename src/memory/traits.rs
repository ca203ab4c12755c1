/*!
 * Memory Traits
 * Allocator abstractions
 */

use super::types::*;
use crate::core::types::{PoolPtr, Size};

/// Allocation interface
pub trait Allocator: Send + Sync {
    /// Allocate `size` bytes; zero yields `PoolPtr::EMPTY`
    fn alloc(&self, size: Size) -> MemoryResult<PoolPtr>;

    /// Release a region; `None` and `EMPTY` are no-ops
    fn free(&self, ptr: Option<PoolPtr>) -> MemoryResult<()>;

    /// Resize a region, possibly moving it
    fn resize(&self, ptr: Option<PoolPtr>, new_size: Size) -> MemoryResult<PoolPtr>;

    /// Check if a pointer refers to a live allocation
    fn is_live(&self, ptr: PoolPtr) -> bool;

    /// Get the usable size of a live allocation
    fn usable_size(&self, ptr: PoolPtr) -> MemoryResult<Size>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryResult<MemoryStats>;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryResult<MemoryPressure> {
        Ok(self.stats()?.memory_pressure())
    }
}

/// Bounds-checked access to the bytes of live allocations
pub trait RegionAccess: Send + Sync {
    /// Fill `buf` from `offset` within the region at `ptr`
    fn read_into(&self, ptr: PoolPtr, offset: usize, buf: &mut [u8]) -> MemoryResult<()>;

    /// Write `data` at `offset` within the region at `ptr`
    fn write_bytes(&self, ptr: PoolPtr, offset: usize, data: &[u8]) -> MemoryResult<()>;

    /// Read `len` bytes from `offset` within the region at `ptr`
    ///
    /// The range is checked against the region before anything is allocated.
    fn read_bytes(&self, ptr: PoolPtr, offset: usize, len: usize) -> MemoryResult<Vec<u8>>;
}
