/*!
 * Pool Storage Operations
 * Bounds-checked reads and writes into live regions
 */

use super::super::types::{MemoryError, MemoryResult};
use super::{Pool, PoolAllocator};
use crate::core::types::{Address, PoolPtr, Size};
use tracing::trace;

fn check_bounds(offset: usize, len: usize, size: Size) -> MemoryResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(MemoryError::OutOfBounds { offset, len, size }),
    }
}

impl Pool {
    /// Header offset and usable size of the live region at `ptr`
    fn live_region(&self, ptr: PoolPtr) -> MemoryResult<(Address, Size)> {
        if ptr.is_empty() {
            return Err(MemoryError::InvalidPointer(ptr.offset()));
        }
        self.chain
            .find_occupied(ptr.offset())
            .map(|(at, header)| (at, header.size))
            .ok_or(MemoryError::InvalidPointer(ptr.offset()))
    }
}

impl PoolAllocator {
    /// Write bytes into a live region
    pub fn write_bytes(&self, ptr: PoolPtr, offset: usize, data: &[u8]) -> MemoryResult<()> {
        let mut slot = self.slot.lock();
        let pool = slot.ready_mut()?;
        let (at, size) = pool.live_region(ptr)?;
        check_bounds(offset, data.len(), size)?;

        pool.chain.region_mut(at, size)[offset..offset + data.len()].copy_from_slice(data);
        trace!(%ptr, offset, len = data.len(), "Wrote bytes");
        Ok(())
    }

    /// Read bytes from a live region into `buf`
    pub fn read_into(&self, ptr: PoolPtr, offset: usize, buf: &mut [u8]) -> MemoryResult<()> {
        let slot = self.slot.lock();
        let pool = slot.ready()?;
        let (at, size) = pool.live_region(ptr)?;
        check_bounds(offset, buf.len(), size)?;

        buf.copy_from_slice(&pool.chain.region(at, size)[offset..offset + buf.len()]);
        trace!(%ptr, offset, len = buf.len(), "Read bytes");
        Ok(())
    }

    /// Read `len` bytes from a live region
    pub fn read_bytes(&self, ptr: PoolPtr, offset: usize, len: usize) -> MemoryResult<Vec<u8>> {
        let slot = self.slot.lock();
        let pool = slot.ready()?;
        let (at, size) = pool.live_region(ptr)?;
        check_bounds(offset, len, size)?;

        trace!(%ptr, offset, len, "Read bytes");
        Ok(pool.chain.region(at, size)[offset..offset + len].to_vec())
    }

    /// Set every usable byte of a live region to `byte`
    pub fn fill(&self, ptr: PoolPtr, byte: u8) -> MemoryResult<()> {
        let mut slot = self.slot.lock();
        let pool = slot.ready_mut()?;
        let (at, size) = pool.live_region(ptr)?;
        pool.chain.region_mut(at, size).fill(byte);
        Ok(())
    }

    /// Usable size of a live region; `EMPTY` has size zero
    pub fn usable_size(&self, ptr: PoolPtr) -> MemoryResult<Size> {
        if ptr.is_empty() {
            return Ok(0);
        }
        let slot = self.slot.lock();
        slot.ready()?.live_region(ptr).map(|(_, size)| size)
    }
}
