/*!
 * Pool Memory Management
 *
 * First-fit allocator over a single fixed-size pool.
 *
 * ## Layout
 *
 * The pool is one owned byte buffer. Each region starts with an in-band
 * header (size, next offset, state tag) and the headers form an
 * address-ordered chain tiling the buffer. Pointers handed out are offsets
 * of usable regions (`PoolPtr`), validated against the chain on every use.
 *
 * ## Policy
 *
 * - **First-fit**: the lowest-addressed free block that is large enough wins
 * - **Splitting**: a block is split only when the excess can hold a header
 *   and at least one alignment unit
 * - **Eager coalescing**: every free merges all runs of adjacent free blocks
 * - **Resize**: fits in place, else grows into a free right neighbour, else
 *   relocates and copies; a failed resize leaves the original untouched
 *
 * ## Concurrency
 *
 * One mutex guards the whole chain. Every public operation holds it for its
 * full duration; clones of a `PoolAllocator` share the same pool.
 */

mod allocator;
mod free_list;
mod guard_ext;
mod info;
mod lifecycle;
mod storage;

pub use guard_ext::{PoolGuard, PoolGuardExt};

use super::config::PoolConfig;
use super::traits::{Allocator, MemoryInfo, RegionAccess};
use super::types::{MemoryError, MemoryResult, MemoryStats};
use crate::core::types::{PoolPtr, Size};
use free_list::BlockChain;
use parking_lot::Mutex;
use std::sync::Arc;

/// Lifetime counters kept alongside the chain
#[derive(Debug, Clone, Default)]
pub(super) struct PoolCounters {
    pub allocations: u64,
    pub frees: u64,
    pub resizes: u64,
    pub failed_allocations: u64,
    pub invalid_frees: u64,
    pub used: Size,
    pub peak_used: Size,
}

impl PoolCounters {
    fn grow_used(&mut self, bytes: Size) {
        self.used += bytes;
        if self.used > self.peak_used {
            self.peak_used = self.used;
        }
    }

    fn shrink_used(&mut self, bytes: Size) {
        self.used = self.used.saturating_sub(bytes);
    }
}

/// An initialized pool: descriptor chain plus counters
#[derive(Debug)]
pub(super) struct Pool {
    chain: BlockChain,
    counters: PoolCounters,
}

impl Pool {
    fn new(chain: BlockChain) -> Self {
        Self {
            chain,
            counters: PoolCounters::default(),
        }
    }
}

/// Allocator lifecycle slot guarded by the pool mutex
#[derive(Debug)]
pub(super) enum PoolSlot {
    Uninitialized,
    Ready(Pool),
}

impl PoolSlot {
    fn ready(&self) -> MemoryResult<&Pool> {
        match self {
            PoolSlot::Ready(pool) => Ok(pool),
            PoolSlot::Uninitialized => Err(MemoryError::NotInitialized),
        }
    }

    fn ready_mut(&mut self) -> MemoryResult<&mut Pool> {
        match self {
            PoolSlot::Ready(pool) => Ok(pool),
            PoolSlot::Uninitialized => Err(MemoryError::NotInitialized),
        }
    }
}

/// Pool allocator handle
///
/// Cheap to clone; all clones share one pool and one lock.
pub struct PoolAllocator {
    slot: Arc<Mutex<PoolSlot>>,
    config: PoolConfig,
}

impl PoolAllocator {
    /// Create an allocator in the `Uninitialized` state
    pub fn new() -> Self {
        Self::uninitialized(PoolConfig::default())
    }

    fn uninitialized(config: PoolConfig) -> Self {
        Self {
            slot: Arc::new(Mutex::new(PoolSlot::Uninitialized)),
            config,
        }
    }

    /// Create and initialize an allocator from a configuration
    pub fn with_config(config: PoolConfig) -> MemoryResult<Self> {
        config.validate()?;
        let capacity = config.capacity;
        let allocator = Self::uninitialized(config);
        allocator.init(capacity)?;
        Ok(allocator)
    }

    /// Create and initialize an allocator with default tuning (useful for testing)
    pub fn with_capacity(capacity: Size) -> MemoryResult<Self> {
        Self::with_config(PoolConfig::with_capacity(capacity))
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

// Implement trait interfaces
impl Allocator for PoolAllocator {
    fn alloc(&self, size: Size) -> MemoryResult<PoolPtr> {
        PoolAllocator::alloc(self, size)
    }

    fn free(&self, ptr: Option<PoolPtr>) -> MemoryResult<()> {
        PoolAllocator::free(self, ptr)
    }

    fn resize(&self, ptr: Option<PoolPtr>, new_size: Size) -> MemoryResult<PoolPtr> {
        PoolAllocator::resize(self, ptr, new_size)
    }

    fn is_live(&self, ptr: PoolPtr) -> bool {
        PoolAllocator::is_live(self, ptr)
    }

    fn usable_size(&self, ptr: PoolPtr) -> MemoryResult<Size> {
        PoolAllocator::usable_size(self, ptr)
    }
}

impl MemoryInfo for PoolAllocator {
    fn stats(&self) -> MemoryResult<MemoryStats> {
        PoolAllocator::stats(self)
    }

    fn pressure(&self) -> MemoryResult<super::types::MemoryPressure> {
        PoolAllocator::memory_pressure(self)
    }
}

impl RegionAccess for PoolAllocator {
    fn read_into(&self, ptr: PoolPtr, offset: usize, buf: &mut [u8]) -> MemoryResult<()> {
        PoolAllocator::read_into(self, ptr, offset, buf)
    }

    fn write_bytes(&self, ptr: PoolPtr, offset: usize, data: &[u8]) -> MemoryResult<()> {
        PoolAllocator::write_bytes(self, ptr, offset, data)
    }

    fn read_bytes(&self, ptr: PoolPtr, offset: usize, len: usize) -> MemoryResult<Vec<u8>> {
        PoolAllocator::read_bytes(self, ptr, offset, len)
    }
}

impl Clone for PoolAllocator {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            config: self.config.clone(),
        }
    }
}

impl Default for PoolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PoolAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}
