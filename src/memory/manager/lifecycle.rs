/*!
 * Pool Lifecycle
 * Uninitialized -> Ready via init, Ready -> Uninitialized via deinit
 */

use super::super::types::{DeinitReport, MemoryError, MemoryResult, PoolState};
use super::free_list::BlockChain;
use super::{Pool, PoolAllocator, PoolSlot};
use crate::core::limits::{ALIGNMENT, HEADER_SIZE};
use crate::core::types::{align_up, Size};
use tracing::{error, info, instrument, warn};

impl PoolAllocator {
    /// Reserve the backing pool and install one free block covering it
    ///
    /// `capacity` is rounded up to the alignment unit. One header's worth of
    /// overhead is reserved on top, so the first allocation can use the full
    /// requested capacity.
    #[instrument(skip(self))]
    pub fn init(&self, capacity: Size) -> MemoryResult<()> {
        if capacity == 0 {
            return Err(MemoryError::InvalidCapacity(capacity));
        }
        if capacity > Size::MAX - ALIGNMENT {
            return Err(MemoryError::PoolAllocationFailed(capacity));
        }

        let mut slot = self.slot.lock();
        if let PoolSlot::Ready(_) = *slot {
            warn!("Rejected init of an already initialized pool");
            return Err(MemoryError::AlreadyInitialized);
        }

        let capacity = align_up(capacity);
        let chain = BlockChain::new(capacity).inspect_err(|e| {
            error!(capacity, error = %e, "Could not reserve backing pool");
        })?;
        *slot = PoolSlot::Ready(Pool::new(chain));

        info!(
            capacity,
            header_size = HEADER_SIZE,
            "Pool initialized with first-fit allocator ({} bytes reserved)",
            capacity + HEADER_SIZE
        );
        Ok(())
    }

    /// Release the pool and every descriptor
    ///
    /// Allocations still live at this point are reported, then dropped with
    /// the buffer. Pointers into the old pool must not be used afterwards.
    #[instrument(skip(self))]
    pub fn deinit(&self) -> MemoryResult<DeinitReport> {
        let mut slot = self.slot.lock();
        let pool = match std::mem::replace(&mut *slot, PoolSlot::Uninitialized) {
            PoolSlot::Ready(pool) => pool,
            PoolSlot::Uninitialized => return Err(MemoryError::NotInitialized),
        };

        let (leaked_blocks, leaked_bytes) = pool
            .chain
            .blocks()
            .filter(|(_, header)| !header.free)
            .fold((0, 0), |(count, bytes), (_, header)| (count + 1, bytes + header.size));

        let report = DeinitReport {
            capacity: pool.chain.capacity(),
            leaked_blocks,
            leaked_bytes,
        };

        if leaked_blocks > 0 {
            warn!(
                leaked_blocks,
                leaked_bytes, "Pool released with live allocations"
            );
        } else {
            info!(capacity = report.capacity, "Pool released");
        }

        Ok(report)
    }

    pub fn state(&self) -> PoolState {
        match *self.slot.lock() {
            PoolSlot::Ready(_) => PoolState::Ready,
            PoolSlot::Uninitialized => PoolState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == PoolState::Ready
    }
}
