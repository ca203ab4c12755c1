/*!
 * Memory Module
 * Fixed-pool allocation and deallocation
 */

pub mod config;
pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use config::PoolConfig;
pub use manager::{PoolAllocator, PoolGuard, PoolGuardExt};
pub use traits::*;
pub use types::*;
