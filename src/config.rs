//! Configuration for manuscript ingestion.

use crate::converter::ConverterOptions;

/// Default converter memory ceiling in bytes (2200 MiB, matching the limit
/// the hosting environment can absorb without stalling other workers).
pub const DEFAULT_CONVERTER_HEAP_LIMIT: u64 = 2200 * 1024 * 1024;

/// Default advisory-lock lifetime in seconds (15 minutes).
pub const DEFAULT_LOCK_TIMEOUT_SECS: i64 = 60 * 15;

/// Default lock-refresh debounce window in seconds.
pub const DEFAULT_LOCK_DEBOUNCE_SECS: i64 = 10;

/// Ingestion pipeline configuration.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Memory ceiling for the external converter, in bytes. `None` disables
    /// the ceiling (development only).
    pub converter_heap_limit: Option<u64>,

    /// Seconds an advisory lock stays active after its last refresh.
    pub lock_timeout_secs: i64,

    /// Seconds within which a same-holder lock refresh performs no write.
    pub lock_debounce_secs: i64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestConfig {
    /// Create new configuration with production defaults.
    pub fn new() -> Self {
        Self {
            converter_heap_limit: Some(DEFAULT_CONVERTER_HEAP_LIMIT),
            lock_timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
            lock_debounce_secs: DEFAULT_LOCK_DEBOUNCE_SECS,
        }
    }

    /// Development preset: no converter memory ceiling.
    pub fn development() -> Self {
        Self::new().with_converter_heap_limit(None)
    }

    /// Set or clear the converter memory ceiling.
    pub fn with_converter_heap_limit(mut self, limit: Option<u64>) -> Self {
        self.converter_heap_limit = limit;
        self
    }

    /// Set the advisory-lock lifetime.
    pub fn with_lock_timeout_secs(mut self, secs: i64) -> Self {
        self.lock_timeout_secs = secs;
        self
    }

    /// Set the lock-refresh debounce window.
    pub fn with_lock_debounce_secs(mut self, secs: i64) -> Self {
        self.lock_debounce_secs = secs;
        self
    }

    /// Converter options derived from this configuration.
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            max_heap_bytes: self.converter_heap_limit,
        }
    }
}
