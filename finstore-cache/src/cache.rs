use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use finstore_types::{
    CacheConfig, ExporterId, ExporterType, FinStoreError, InstrumentInfo, TimeSeriesPoint,
};
use moka::future::Cache;

/// Identity of a cached instruments list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentsKey {
    /// Exporter type that produced the list.
    pub exporter_type: ExporterType,
    /// Canonical JSON of the info parameters.
    pub parameters: String,
}

impl InstrumentsKey {
    /// Build a key from the exporter type and its info parameters.
    #[must_use]
    pub fn new(exporter_type: ExporterType, parameters: &serde_json::Value) -> Self {
        Self {
            exporter_type,
            parameters: parameters.to_string(),
        }
    }
}

/// Identity of a cached history download.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    /// Exporter the download belongs to.
    pub exporter: ExporterId,
    /// Requested window start.
    pub moment_from: DateTime<FixedOffset>,
    /// Requested window end.
    pub moment_to: DateTime<FixedOffset>,
}

impl HistoryKey {
    /// Build a key.
    #[must_use]
    pub const fn new(
        exporter: ExporterId,
        moment_from: DateTime<FixedOffset>,
        moment_to: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            exporter,
            moment_from,
            moment_to,
        }
    }
}

fn build_store<K, V>(ttl: Option<Duration>, capacity: u64) -> Option<Cache<K, V>>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let ttl = ttl?;
    Some(
        Cache::builder()
            .max_capacity(capacity.max(1))
            .time_to_live(ttl)
            .build(),
    )
}

/// Static data cache service.
///
/// Construct once at startup and share (it is cheap to clone). A store whose
/// TTL is zero is absent and every lookup goes straight to the loader.
#[derive(Clone)]
pub struct StaticDataCache {
    instruments: Option<Cache<InstrumentsKey, Arc<Vec<InstrumentInfo>>>>,
    history: Option<Cache<HistoryKey, Arc<Vec<TimeSeriesPoint>>>>,
}

impl std::fmt::Debug for StaticDataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDataCache")
            .field("instruments", &self.instruments.as_ref().map(Cache::entry_count))
            .field("history", &self.history.as_ref().map(Cache::entry_count))
            .finish()
    }
}

impl StaticDataCache {
    /// Create the cache from its configuration.
    #[must_use]
    pub fn new(cfg: &CacheConfig) -> Self {
        Self {
            instruments: build_store(cfg.instruments_ttl(), cfg.max_entries),
            history: build_store(cfg.history_ttl(), cfg.max_entries),
        }
    }

    /// Instruments list for `key`, running `loader` on a miss.
    ///
    /// Concurrent misses for the same key share one loader run.
    ///
    /// # Errors
    /// Returns the loader's error; failures are not cached.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::cache::instruments",
            skip(self, loader),
            fields(exporter_type = %key.exporter_type),
        )
    )]
    pub async fn instruments<F, Fut>(
        &self,
        key: InstrumentsKey,
        loader: F,
    ) -> Result<Arc<Vec<InstrumentInfo>>, FinStoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<InstrumentInfo>, FinStoreError>>,
    {
        match &self.instruments {
            Some(store) => store
                .try_get_with(key, async move { loader().await.map(Arc::new) })
                .await
                .map_err(|e| (*e).clone()),
            None => loader().await.map(Arc::new),
        }
    }

    /// History download for `key`, running `loader` on a miss.
    ///
    /// # Errors
    /// Returns the loader's error; failures are not cached.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::cache::history",
            skip(self, loader),
            fields(exporter = %key.exporter, from = %key.moment_from, to = %key.moment_to),
        )
    )]
    pub async fn history<F, Fut>(
        &self,
        key: HistoryKey,
        loader: F,
    ) -> Result<Arc<Vec<TimeSeriesPoint>>, FinStoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TimeSeriesPoint>, FinStoreError>>,
    {
        match &self.history {
            Some(store) => store
                .try_get_with(key, async move { loader().await.map(Arc::new) })
                .await
                .map_err(|e| (*e).clone()),
            None => loader().await.map(Arc::new),
        }
    }

    /// Forget one history download.
    pub async fn drop_history(&self, key: &HistoryKey) {
        if let Some(store) = &self.history {
            store.invalidate(key).await;
        }
    }

    /// Forget every history download of an exporter.
    pub async fn invalidate_exporter(&self, exporter: ExporterId) {
        if let Some(store) = &self.history {
            let keys: Vec<Arc<HistoryKey>> = store
                .iter()
                .filter(|(k, _)| k.exporter == exporter)
                .map(|(k, _)| k)
                .collect();
            for key in keys {
                store.invalidate(key.as_ref()).await;
            }
        }
    }

    /// Forget every instruments list produced by an exporter type.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::cache::invalidate_exporter_type",
            skip(self),
            fields(exporter_type = %exporter_type),
        )
    )]
    pub async fn invalidate_exporter_type(&self, exporter_type: &ExporterType) {
        if let Some(store) = &self.instruments {
            let keys: Vec<Arc<InstrumentsKey>> = store
                .iter()
                .filter(|(k, _)| &k.exporter_type == exporter_type)
                .map(|(k, _)| k)
                .collect();
            for key in keys {
                store.invalidate(key.as_ref()).await;
            }
        }
    }

    /// Forget everything.
    pub fn invalidate_all(&self) {
        if let Some(store) = &self.instruments {
            store.invalidate_all();
        }
        if let Some(store) = &self.history {
            store.invalidate_all();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "finstore::cache", "static data cache cleared");
    }

    /// True when the instruments cache is enabled.
    #[must_use]
    pub const fn caches_instruments(&self) -> bool {
        self.instruments.is_some()
    }

    /// True when the history cache is enabled.
    #[must_use]
    pub const fn caches_history(&self) -> bool {
        self.history.is_some()
    }
}
