/*!
 * Pool Memory Library
 *
 * A first-fit allocator over one fixed-size byte pool, plus a singly linked
 * list of u16 values whose nodes are allocated from that pool.
 *
 * ```rust
 * use poolmem::{PoolAllocator, PoolList};
 *
 * let pool = PoolAllocator::with_capacity(1024)?;
 * let list = PoolList::new(pool.clone());
 * list.insert(1)?;
 * list.insert(2)?;
 * list.insert(3)?;
 * assert_eq!(list.to_string(), "[1, 2, 3]");
 * assert_eq!(pool.stats()?.occupied_blocks, 3);
 * # Ok::<(), poolmem::ListError>(())
 * ```
 */

pub mod core;
pub mod list;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::limits;
pub use crate::core::types::{align_up, Address, PoolPtr, Size};
pub use list::{ListError, ListResult, NodeRef, PoolList};
pub use memory::{
    Allocator, BlockInfo, DeinitReport, MemoryError, MemoryInfo, MemoryPressure, MemoryResult,
    MemoryStats, PoolAllocator, PoolConfig, PoolGuard, PoolGuardExt, PoolSnapshot, PoolState,
    RegionAccess,
};
pub use monitoring::{init_tracing, TraceFormat};
