/*!
 * Memory Types
 * Common types for pool management
 */

use crate::core::types::{Address, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Out of space: requested {requested} bytes, largest free block {largest_free} bytes ({available} free / {capacity} total)")]
    #[diagnostic(
        code(memory::out_of_space),
        help("No free block is large enough. Free other allocations and retry.")
    )]
    OutOfSpace {
        requested: Size,
        largest_free: Size,
        available: Size,
        capacity: Size,
    },

    #[error("Invalid pool pointer: 0x{0:x}")]
    #[diagnostic(
        code(memory::invalid_pointer),
        help("The pointer was never returned by this pool, or it was already freed.")
    )]
    InvalidPointer(Address),

    #[error("Access out of bounds: {len} bytes at offset {offset} in a {size}-byte region")]
    #[diagnostic(code(memory::out_of_bounds))]
    OutOfBounds { offset: usize, len: usize, size: Size },

    #[error("Invalid pool capacity: {0}")]
    #[diagnostic(code(memory::invalid_capacity), help("Pool capacity must be greater than zero."))]
    InvalidCapacity(Size),

    #[error("Failed to reserve {0} bytes for the backing pool")]
    #[diagnostic(
        code(memory::pool_allocation_failed),
        help("The host could not provide the backing buffer. Try a smaller capacity.")
    )]
    PoolAllocationFailed(Size),

    #[error("Pool is not initialized")]
    #[diagnostic(code(memory::not_initialized), help("Call init() before using the pool."))]
    NotInitialized,

    #[error("Pool is already initialized")]
    #[diagnostic(code(memory::already_initialized), help("Call deinit() before re-initializing."))]
    AlreadyInitialized,

    #[error("Pool corruption detected at 0x{offset:x}: {reason}")]
    #[diagnostic(code(memory::corruption))]
    CorruptionDetected { offset: Address, reason: String },

    #[error("Invalid pool configuration: {0}")]
    #[diagnostic(code(memory::invalid_config))]
    InvalidConfig(String),
}

/// Lifecycle of a pool allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolState {
    Uninitialized,
    Ready,
}

/// One block descriptor as seen from outside the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Offset of the in-band header
    pub header: Address,
    /// Usable bytes after the header
    pub size: Size,
    pub is_free: bool,
}

impl BlockInfo {
    /// Offset of the first usable byte
    pub fn usable(&self) -> Address {
        self.header + crate::core::limits::HEADER_SIZE
    }

    /// One past the last byte covered by this block, header included
    pub fn end(&self) -> Address {
        self.usable() + self.size
    }
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub capacity: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub largest_free_block: Size,
    /// Bytes taken by headers beyond the one charged at init
    pub overhead: Size,
    pub usage_percentage: f64,
    pub occupied_blocks: usize,
    pub free_blocks: usize,
    pub allocations: u64,
    pub frees: u64,
    pub resizes: u64,
    pub failed_allocations: u64,
    pub invalid_frees: u64,
    pub peak_used: Size,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(
            self.usage_percentage / 100.0,
            crate::core::limits::DEFAULT_WARNING_THRESHOLD,
            crate::core::limits::DEFAULT_CRITICAL_THRESHOLD,
        )
    }

    /// Share of free bytes outside the largest free block
    pub fn fragmentation(&self) -> f64 {
        if self.available_memory == 0 {
            return 0.0;
        }
        1.0 - self.largest_free_block as f64 / self.available_memory as f64
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64, warning: f64, critical: f64) -> Self {
        if ratio >= critical {
            MemoryPressure::Critical
        } else if ratio >= warning {
            MemoryPressure::High
        } else if ratio >= crate::core::limits::MEDIUM_PRESSURE_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Serializable view of the whole pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub stats: MemoryStats,
    pub blocks: Vec<BlockInfo>,
}

/// Outcome of tearing a pool down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeinitReport {
    pub capacity: Size,
    /// Allocations that were still live when the pool was released
    pub leaked_blocks: usize,
    pub leaked_bytes: Size,
}
