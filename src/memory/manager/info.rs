/*!
 * Pool Introspection
 * Statistics, block listings and invariant checks
 */

use super::super::types::{
    BlockInfo, MemoryPressure, MemoryResult, MemoryStats, PoolSnapshot,
};
use super::{Pool, PoolAllocator};
use crate::core::limits::HEADER_SIZE;
use crate::core::types::{PoolPtr, Size};
use tracing::{debug, error};

impl Pool {
    fn stats(&self) -> MemoryStats {
        let capacity = self.chain.capacity();
        let mut stats = MemoryStats {
            capacity,
            used_memory: 0,
            available_memory: 0,
            largest_free_block: 0,
            overhead: 0,
            usage_percentage: 0.0,
            occupied_blocks: 0,
            free_blocks: 0,
            allocations: self.counters.allocations,
            frees: self.counters.frees,
            resizes: self.counters.resizes,
            failed_allocations: self.counters.failed_allocations,
            invalid_frees: self.counters.invalid_frees,
            peak_used: self.counters.peak_used,
        };

        for (_, header) in self.chain.blocks() {
            if header.free {
                stats.free_blocks += 1;
                stats.available_memory += header.size;
                stats.largest_free_block = stats.largest_free_block.max(header.size);
            } else {
                stats.occupied_blocks += 1;
                stats.used_memory += header.size;
            }
        }

        let blocks = stats.free_blocks + stats.occupied_blocks;
        stats.overhead = blocks.saturating_sub(1) * HEADER_SIZE;
        stats.usage_percentage = (stats.used_memory as f64 / capacity as f64) * 100.0;
        stats
    }
}

impl PoolAllocator {
    /// Get overall memory statistics
    pub fn stats(&self) -> MemoryResult<MemoryStats> {
        let slot = self.slot.lock();
        Ok(slot.ready()?.stats())
    }

    /// Current pressure level using this allocator's configured thresholds
    pub fn memory_pressure(&self) -> MemoryResult<MemoryPressure> {
        let stats = self.stats()?;
        Ok(MemoryPressure::from_ratio(
            stats.usage_percentage / 100.0,
            self.config.warning_threshold,
            self.config.critical_threshold,
        ))
    }

    /// Usable bytes in the pool, before header overhead
    pub fn capacity(&self) -> MemoryResult<Size> {
        let slot = self.slot.lock();
        Ok(slot.ready()?.chain.capacity())
    }

    /// Every block descriptor in address order
    pub fn blocks(&self) -> MemoryResult<Vec<BlockInfo>> {
        let slot = self.slot.lock();
        Ok(slot.ready()?.chain.block_infos())
    }

    /// Stats and block listing taken under one lock acquisition
    pub fn snapshot(&self) -> MemoryResult<PoolSnapshot> {
        let slot = self.slot.lock();
        let pool = slot.ready()?;
        Ok(PoolSnapshot {
            stats: pool.stats(),
            blocks: pool.chain.block_infos(),
        })
    }

    /// Check if a pointer refers to a live allocation
    pub fn is_live(&self, ptr: PoolPtr) -> bool {
        if ptr.is_empty() {
            return false;
        }
        let slot = self.slot.lock();
        slot.ready()
            .map(|pool| pool.chain.find_occupied(ptr.offset()).is_some())
            .unwrap_or(false)
    }

    /// Walk the descriptor chain and verify tiling, tags and coalescing
    pub fn validate(&self) -> MemoryResult<()> {
        let slot = self.slot.lock();
        let pool = slot.ready()?;
        match pool.chain.validate() {
            Ok(()) => {
                debug!("Pool chain validated");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Pool chain failed validation");
                Err(e)
            }
        }
    }
}
