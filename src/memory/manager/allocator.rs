/*!
 * Pool Allocator Implementation
 * Allocation, deallocation and resize logic
 */

use super::super::config::PoolConfig;
use super::super::types::{MemoryError, MemoryPressure, MemoryResult};
use super::{Pool, PoolAllocator};
use crate::core::limits::HEADER_SIZE;
use crate::core::types::{align_up, PoolPtr, Size};
use tracing::{debug, error, instrument, warn};

impl Pool {
    pub(super) fn alloc(&mut self, size: Size, config: &PoolConfig) -> MemoryResult<PoolPtr> {
        if size == 0 {
            debug!("Zero-byte request, returning empty sentinel");
            return Ok(PoolPtr::EMPTY);
        }

        if size > self.chain.capacity() {
            return Err(self.out_of_space(size));
        }

        let wanted = align_up(size);
        let Some(carve) = self.chain.take(wanted) else {
            return Err(self.out_of_space(size));
        };

        self.counters.allocations += 1;
        self.counters.grow_used(carve.size);
        let ptr = PoolPtr::new(carve.header + HEADER_SIZE);

        if let Some(remainder) = carve.remainder {
            debug!(
                header = carve.header,
                remainder, "Split free block, remainder returned to chain"
            );
        }

        let used = self.counters.used;
        let capacity = self.chain.capacity();
        let ratio = used as f64 / capacity as f64;
        match MemoryPressure::from_ratio(ratio, config.warning_threshold, config.critical_threshold)
        {
            level @ (MemoryPressure::High | MemoryPressure::Critical) => warn!(
                %ptr, requested = size, block = carve.size, used, capacity,
                "Memory pressure {}: {:.1}% of pool in use", level, ratio * 100.0
            ),
            _ => debug!(%ptr, requested = size, block = carve.size, "Allocated"),
        }

        Ok(ptr)
    }

    pub(super) fn free(&mut self, ptr: Option<PoolPtr>, config: &PoolConfig) -> MemoryResult<()> {
        let Some(ptr) = ptr.filter(|p| !p.is_empty()) else {
            return Ok(());
        };

        let Some((at, header)) = self.chain.find_occupied(ptr.offset()) else {
            self.counters.invalid_frees += 1;
            warn!(%ptr, "Rejected free of invalid or already freed pointer");
            return Err(MemoryError::InvalidPointer(ptr.offset()));
        };

        if config.scrub_on_free {
            self.chain.region_mut(at, header.size).fill(0);
        }
        self.chain.release(at);
        let merged = self.chain.coalesce();

        self.counters.frees += 1;
        self.counters.shrink_used(header.size);

        debug!(%ptr, size = header.size, merged, "Freed block");
        Ok(())
    }

    #[instrument(skip(self, config), level = "debug")]
    pub(super) fn resize(
        &mut self,
        ptr: Option<PoolPtr>,
        new_size: Size,
        config: &PoolConfig,
    ) -> MemoryResult<PoolPtr> {
        let Some(ptr) = ptr.filter(|p| !p.is_empty()) else {
            return self.alloc(new_size, config);
        };

        if new_size == 0 {
            self.free(Some(ptr), config)?;
            return Ok(PoolPtr::EMPTY);
        }

        let Some((at, header)) = self.chain.find_occupied(ptr.offset()) else {
            warn!(%ptr, "Rejected resize of invalid or already freed pointer");
            return Err(MemoryError::InvalidPointer(ptr.offset()));
        };

        if header.size >= new_size {
            self.counters.resizes += 1;
            debug!(%ptr, size = header.size, new_size, "Resize fits in place");
            return Ok(ptr);
        }

        if new_size > self.chain.capacity() {
            return Err(self.out_of_space(new_size));
        }

        let wanted = align_up(new_size);
        if self.chain.grow_in_place(at, wanted) {
            let grown = self.chain.read_header(at).size;
            self.counters.resizes += 1;
            self.counters.grow_used(grown - header.size);
            debug!(%ptr, from = header.size, to = grown, "Grew block into free neighbour");
            return Ok(ptr);
        }

        // Relocate: the original stays intact until the new block exists
        let Some(carve) = self.chain.take(wanted) else {
            return Err(self.out_of_space(new_size));
        };

        self.chain.copy_region(at, carve.header, header.size);
        if config.scrub_on_free {
            self.chain.region_mut(at, header.size).fill(0);
        }
        self.chain.release(at);
        self.chain.coalesce();

        self.counters.resizes += 1;
        self.counters.grow_used(carve.size);
        self.counters.shrink_used(header.size);

        let moved = PoolPtr::new(carve.header + HEADER_SIZE);
        debug!(from = %ptr, to = %moved, copied = header.size, "Relocated block");
        Ok(moved)
    }

    /// Build an `OutOfSpace` error with the current free-space picture
    fn out_of_space(&mut self, requested: Size) -> MemoryError {
        self.counters.failed_allocations += 1;

        let (available, largest_free) = self
            .chain
            .blocks()
            .filter(|(_, header)| header.free)
            .fold((0, 0), |(total, largest), (_, header)| {
                (total + header.size, largest.max(header.size))
            });
        let capacity = self.chain.capacity();

        error!(
            requested,
            largest_free, available, capacity, "Out of space in pool"
        );

        MemoryError::OutOfSpace {
            requested,
            largest_free,
            available,
            capacity,
        }
    }
}

impl PoolAllocator {
    /// Allocate `size` bytes with first-fit placement
    ///
    /// A zero-byte request returns `PoolPtr::EMPTY`, which is neither an
    /// error nor a region that can be read, written or freed.
    pub fn alloc(&self, size: Size) -> MemoryResult<PoolPtr> {
        let mut slot = self.slot.lock();
        slot.ready_mut()?.alloc(size, &self.config)
    }

    /// Free a region and coalesce adjacent free blocks
    ///
    /// `None` and `PoolPtr::EMPTY` are accepted as no-ops. Unknown and
    /// already-freed pointers are rejected with `InvalidPointer` without
    /// touching the pool.
    pub fn free<P: Into<Option<PoolPtr>>>(&self, ptr: P) -> MemoryResult<()> {
        let ptr = ptr.into();
        let mut slot = self.slot.lock();
        slot.ready_mut()?.free(ptr, &self.config)
    }

    /// Resize a region, moving it only when it cannot grow in place
    ///
    /// `None`/`EMPTY` behaves as `alloc(new_size)`; `new_size == 0` behaves
    /// as `free(ptr)` and returns `EMPTY`. On `OutOfSpace` the original
    /// region and its contents are left as they were.
    pub fn resize<P>(&self, ptr: P, new_size: Size) -> MemoryResult<PoolPtr>
    where
        P: Into<Option<PoolPtr>>,
    {
        let ptr = ptr.into();
        let mut slot = self.slot.lock();
        slot.ready_mut()?.resize(ptr, new_size, &self.config)
    }
}
