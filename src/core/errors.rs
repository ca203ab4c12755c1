/*!
 * Error Types
 * Centralized re-exports of every error the crate can return
 */

// Re-export MemoryError from memory module
pub use crate::memory::{MemoryError, MemoryResult};

// Re-export ListError from list module
pub use crate::list::{ListError, ListResult};
