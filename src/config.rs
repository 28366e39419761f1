use std::time::Duration;

use crate::error::ConfigError;

/// Eviction policy for the upload directory.
///
/// Read-only after startup. The process entry point builds one from CLI
/// arguments / environment variables; tests construct it directly so no
/// environment mutation is needed.
#[derive(Clone, Debug)]
pub struct Policy {
    /// Time to wait between two sweeps.
    pub interval: Duration,
    /// Maximum idle age of a session before it is removed unconditionally.
    pub retention: Duration,
    /// Hard ceiling on the total size of the upload root, in megabytes.
    pub max_storage_mb: u64,
    /// Proactive eviction threshold, as a percentage of `max_storage_mb`.
    pub warn_percent: u64,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            interval: Duration::from_secs(1800),
            retention: Duration::from_secs(3600),
            max_storage_mb: 500,
            warn_percent: 80,
        }
    }
}

impl Policy {
    /// Hard storage ceiling in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_storage_mb << 20
    }

    /// Proactive threshold in bytes. Capacity eviction targets this line
    /// rather than the hard ceiling so each sweep leaves headroom for the
    /// uploads that arrive before the next one.
    pub fn proactive_bytes(&self) -> u64 {
        self.max_bytes() * self.warn_percent / 100
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.max_storage_mb == 0 {
            return Err(ConfigError::ZeroStorage);
        }
        if self.warn_percent == 0 || self.warn_percent > 100 {
            return Err(ConfigError::WarnPercentOutOfRange(self.warn_percent));
        }
        Ok(())
    }
}
