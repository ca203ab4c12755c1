/*!
 * Pool Limits and Constants
 *
 * Layout constants for the in-band block headers and list nodes, plus
 * default tuning values for a freshly configured pool.
 */

// =============================================================================
// LAYOUT
// =============================================================================

/// Alignment unit for every header offset and every usable region
pub const ALIGNMENT: usize = 8;

/// Width of one header field
pub const WORD_SIZE: usize = 8;

/// In-band block header: size, next offset, state tag
pub const HEADER_SIZE: usize = 3 * WORD_SIZE;

/// Storage for one list node: u16 payload, padding, next offset
pub const NODE_SIZE: usize = 2 * WORD_SIZE;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default pool capacity (64KB)
pub const DEFAULT_POOL_CAPACITY: usize = 64 * 1024;

/// Usage ratio that logs a HIGH pressure warning
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.80;

/// Usage ratio that logs a CRITICAL pressure warning
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.95;

/// Usage ratio reported as MEDIUM pressure
pub const MEDIUM_PRESSURE_THRESHOLD: f64 = 0.60;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides `PoolConfig::capacity`
pub const ENV_CAPACITY: &str = "POOLMEM_CAPACITY";

/// Overrides `PoolConfig::scrub_on_free` ("1"/"true")
pub const ENV_SCRUB_ON_FREE: &str = "POOLMEM_SCRUB_ON_FREE";

/// Switches tracing output to JSON ("1"/"true")
pub const ENV_TRACE_JSON: &str = "POOLMEM_TRACE_JSON";
