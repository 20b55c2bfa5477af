//! Configuration types shared across the orchestrator and the cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Expiry and capacity settings for the static data cache.
///
/// A TTL of zero disables the corresponding cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached instruments list, in milliseconds.
    pub instruments_ttl_ms: u64,
    /// Lifetime of a cached history download, in milliseconds.
    pub history_ttl_ms: u64,
    /// Maximum number of entries per cache.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            instruments_ttl_ms: 24 * 60 * 60 * 1000,
            history_ttl_ms: 60 * 60 * 1000,
            max_entries: 1024,
        }
    }
}

impl CacheConfig {
    /// TTL for instruments lists, or `None` when disabled.
    #[must_use]
    pub const fn instruments_ttl(&self) -> Option<Duration> {
        if self.instruments_ttl_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.instruments_ttl_ms))
        }
    }

    /// TTL for history downloads, or `None` when disabled.
    #[must_use]
    pub const fn history_ttl(&self) -> Option<Duration> {
        if self.history_ttl_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.history_ttl_ms))
        }
    }
}

/// Global configuration for the `FinStore` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinStoreConfig {
    /// Timezone used to turn request dates into moments and to truncate daily series.
    pub timezone: chrono_tz::Tz,
    /// Timeout for individual exporter calls (downloads, instrument lists, API probes).
    pub download_timeout: Duration,
    /// Days fetched when actualizing an exporter that has no history at all.
    pub bootstrap_days: u32,
    /// Static data cache settings.
    pub cache: CacheConfig,
}

impl Default for FinStoreConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            download_timeout: Duration::from_secs(30),
            bootstrap_days: 2,
            cache: CacheConfig::default(),
        }
    }
}
