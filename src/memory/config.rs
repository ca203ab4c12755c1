/*!
 * Pool Configuration
 * Capacity and tuning knobs, loadable from defaults, environment or JSON
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::limits::{
    DEFAULT_CRITICAL_THRESHOLD, DEFAULT_POOL_CAPACITY, DEFAULT_WARNING_THRESHOLD, ENV_CAPACITY,
    ENV_SCRUB_ON_FREE,
};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pool allocator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Usable bytes in the pool, before header overhead
    pub capacity: Size,
    /// Usage ratio that triggers a HIGH pressure warning
    pub warning_threshold: f64,
    /// Usage ratio that triggers a CRITICAL pressure warning
    pub critical_threshold: f64,
    /// Zero-fill regions when they are freed
    pub scrub_on_free: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
            scrub_on_free: false,
        }
    }
}

impl PoolConfig {
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_scrub_on_free(mut self, scrub: bool) -> Self {
        self.scrub_on_free = scrub;
        self
    }

    /// Defaults overridden by `POOLMEM_CAPACITY` and `POOLMEM_SCRUB_ON_FREE`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_CAPACITY) {
            match raw.trim().parse::<Size>() {
                Ok(capacity) => config.capacity = capacity,
                Err(e) => warn!(
                    var = ENV_CAPACITY,
                    value = %raw,
                    error = %e,
                    "Ignoring invalid capacity override"
                ),
            }
        }

        if let Ok(raw) = std::env::var(ENV_SCRUB_ON_FREE) {
            config.scrub_on_free = matches!(raw.trim(), "1" | "true" | "TRUE" | "yes");
        }

        config
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> MemoryResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MemoryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MemoryResult<()> {
        if self.capacity == 0 {
            return Err(MemoryError::InvalidCapacity(self.capacity));
        }
        let in_range = |t: f64| t > 0.0 && t <= 1.0;
        if !in_range(self.warning_threshold) || !in_range(self.critical_threshold) {
            return Err(MemoryError::InvalidConfig(format!(
                "thresholds must be in (0, 1], got warning={} critical={}",
                self.warning_threshold, self.critical_threshold
            )));
        }
        if self.warning_threshold > self.critical_threshold {
            return Err(MemoryError::InvalidConfig(format!(
                "warning threshold {} exceeds critical threshold {}",
                self.warning_threshold, self.critical_threshold
            )));
        }
        Ok(())
    }
}
