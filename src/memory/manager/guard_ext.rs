/*!
 * Pool Guard Extensions
 *
 * RAII guards for scoped pool allocations
 */

use super::super::types::MemoryResult;
use super::PoolAllocator;
use crate::core::types::{PoolPtr, Size};
use tracing::warn;

/// Scoped pool allocation, freed on drop
///
/// # Example
///
/// ```rust
/// use poolmem::memory::{PoolAllocator, PoolGuardExt};
///
/// let pool = PoolAllocator::with_capacity(1024)?;
/// {
///     let guard = pool.alloc_guard(64)?;
///     guard.write(0, b"scoped")?;
///     assert_eq!(guard.read(0, 6)?, b"scoped".to_vec());
/// }
/// assert_eq!(pool.stats()?.occupied_blocks, 0);
/// # Ok::<(), poolmem::memory::MemoryError>(())
/// ```
pub struct PoolGuard {
    ptr: PoolPtr,
    size: Size,
    allocator: PoolAllocator,
    active: bool,
}

impl PoolGuard {
    fn new(ptr: PoolPtr, size: Size, allocator: PoolAllocator) -> Self {
        Self {
            ptr,
            size,
            allocator,
            active: true,
        }
    }

    #[inline]
    pub fn ptr(&self) -> PoolPtr {
        self.ptr
    }

    /// Requested size (the usable region may be larger)
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn write(&self, offset: usize, data: &[u8]) -> MemoryResult<()> {
        self.allocator.write_bytes(self.ptr, offset, data)
    }

    pub fn read(&self, offset: usize, len: usize) -> MemoryResult<Vec<u8>> {
        self.allocator.read_bytes(self.ptr, offset, len)
    }

    /// Free now and surface any error instead of logging it on drop
    pub fn release(mut self) -> MemoryResult<()> {
        self.active = false;
        self.allocator.free(self.ptr)
    }

    /// Stop guarding and hand the pointer back to manual management
    pub fn into_raw(mut self) -> PoolPtr {
        self.active = false;
        self.ptr
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.allocator.free(self.ptr) {
                warn!(ptr = %self.ptr, error = %e, "Pool guard failed to free its region");
            }
        }
    }
}

/// Extension trait for creating pool guards
pub trait PoolGuardExt {
    /// Allocate with an RAII guard for automatic cleanup
    fn alloc_guard(&self, size: Size) -> MemoryResult<PoolGuard>;
}

impl PoolGuardExt for PoolAllocator {
    fn alloc_guard(&self, size: Size) -> MemoryResult<PoolGuard> {
        let ptr = self.alloc(size)?;
        Ok(PoolGuard::new(ptr, size, self.clone()))
    }
}
