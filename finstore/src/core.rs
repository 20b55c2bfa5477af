use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use finstore_cache::StaticDataCache;
use finstore_core::exporter::ExporterFactory;
use finstore_core::store::RecordStore;
use finstore_core::{
    ExporterId, ExporterRecord, ExporterRegistry, FinStoreConfig, FinStoreError,
};

/// Orchestrator tying the record store, the exporter registry and the static
/// data cache together.
pub struct FinStore {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) registry: ExporterRegistry,
    pub(crate) cache: Option<StaticDataCache>,
    pub(crate) cfg: FinStoreConfig,
    locks: std::sync::Mutex<HashMap<ExporterId, Arc<tokio::sync::Mutex<()>>>>,
}

/// Builder for constructing a `FinStore` orchestrator with custom configuration.
pub struct FinStoreBuilder {
    store: Option<Arc<dyn RecordStore>>,
    factories: Vec<Arc<dyn ExporterFactory>>,
    registry: Option<ExporterRegistry>,
    cache: Option<StaticDataCache>,
    cache_enabled: bool,
    cfg: FinStoreConfig,
}

impl Default for FinStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FinStoreBuilder {
    /// Create a new builder with default configuration.
    ///
    /// A record store must be supplied through [`with_store`](Self::with_store).
    /// Unless replaced or disabled, a cache is built from the configured
    /// [`CacheConfig`](finstore_core::CacheConfig) at `build()`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            factories: Vec::new(),
            registry: None,
            cache: None,
            cache_enabled: true,
            cfg: FinStoreConfig::default(),
        }
    }

    /// Use `store` for persistence.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register an exporter factory.
    ///
    /// Registration order defines registry ids; a duplicate type fails `build()`.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn ExporterFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Start from a prepared registry; factories added with
    /// [`with_factory`](Self::with_factory) are appended to it.
    #[must_use]
    pub fn registry(mut self, registry: ExporterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Share an existing cache instance instead of building one.
    #[must_use]
    pub fn cache(mut self, cache: StaticDataCache) -> Self {
        self.cache = Some(cache);
        self.cache_enabled = true;
        self
    }

    /// Run without a static data cache.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self.cache_enabled = false;
        self
    }

    /// Timezone used to turn request dates into moments and to bucket days.
    #[must_use]
    pub const fn timezone(mut self, tz: Tz) -> Self {
        self.cfg.timezone = tz;
        self
    }

    /// Timeout applied to each exporter call.
    #[must_use]
    pub const fn download_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.download_timeout = timeout;
        self
    }

    /// Days fetched when actualizing an exporter without any history.
    #[must_use]
    pub const fn bootstrap_days(mut self, days: u32) -> Self {
        self.cfg.bootstrap_days = days;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: FinStoreConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `FinStore` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no store was supplied, if a factory type is
    /// registered twice, if the download timeout is zero, or if
    /// `bootstrap_days` is zero.
    pub fn build(self) -> Result<FinStore, FinStoreError> {
        let store = self.store.ok_or_else(|| {
            FinStoreError::InvalidArg(
                "no record store supplied; add one via with_store(...)".to_string(),
            )
        })?;
        if self.cfg.download_timeout.is_zero() {
            return Err(FinStoreError::InvalidArg(
                "download timeout must be positive".to_string(),
            ));
        }
        if self.cfg.bootstrap_days == 0 {
            return Err(FinStoreError::InvalidArg(
                "bootstrap_days must be at least 1".to_string(),
            ));
        }

        let mut registry = self.registry.unwrap_or_default();
        for factory in self.factories {
            registry.register(factory)?;
        }

        let cache = if self.cache_enabled {
            Some(
                self.cache
                    .unwrap_or_else(|| StaticDataCache::new(&self.cfg.cache)),
            )
        } else {
            None
        };

        Ok(FinStore {
            store,
            registry,
            cache,
            cfg: self.cfg,
            locks: std::sync::Mutex::new(HashMap::new()),
        })
    }
}

impl FinStore {
    /// Start building a new `FinStore` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use finstore::FinStore;
    /// use finstore_mock::{MemoryStore, MockExporter};
    ///
    /// let fs = FinStore::builder()
    ///     .with_store(Arc::new(MemoryStore::new()))
    ///     .with_factory(Arc::new(MockExporter::new()))
    ///     .timezone(chrono_tz::Europe::Moscow)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> FinStoreBuilder {
        FinStoreBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &FinStoreConfig {
        &self.cfg
    }

    /// Registered exporter factories.
    #[must_use]
    pub const fn registry(&self) -> &ExporterRegistry {
        &self.registry
    }

    /// Static data cache, when enabled.
    #[must_use]
    pub const fn cache(&self) -> Option<&StaticDataCache> {
        self.cache.as_ref()
    }

    /// Wrap an exporter future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::core::exporter_call_with_timeout",
            skip(fut),
            fields(
                exporter = exporter_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn exporter_call_with_timeout<T, Fut>(
        exporter_name: &str,
        capability: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, FinStoreError>
    where
        Fut: core::future::Future<Output = Result<T, FinStoreError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(FinStoreError::download_timeout(exporter_name, capability)))
    }

    /// Per-exporter write lock serializing reconciliations.
    pub(crate) fn exporter_lock(&self, exporter: ExporterId) -> Arc<tokio::sync::Mutex<()>> {
        let mut guard = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(guard.entry(exporter).or_default())
    }

    pub(crate) fn forget_lock(&self, exporter: ExporterId) {
        let mut guard = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.remove(&exporter);
    }

    /// Start of `date` in the configured timezone.
    pub(crate) fn moment_at(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>, FinStoreError> {
        let tz = self.cfg.timezone;
        finstore_core::local_day_start(tz, date)
            .map(|start| start.with_timezone(&tz).fixed_offset())
            .ok_or_else(|| FinStoreError::InvalidArg(format!("unrepresentable date {date}")))
    }

    pub(crate) async fn require_exporter(&self, code: &str) -> Result<ExporterRecord, FinStoreError> {
        self.store
            .exporter_by_code(code)
            .await?
            .ok_or_else(|| FinStoreError::not_found(format!("exporter {code}")))
    }

    /// Factory of an exporter that may be downloaded.
    ///
    /// # Errors
    /// `ExporterDisabled` when the exporter is inactive or its type is not registered.
    pub(crate) fn enabled_factory(
        &self,
        exporter: &ExporterRecord,
    ) -> Result<&Arc<dyn ExporterFactory>, FinStoreError> {
        if !exporter.is_active {
            return Err(FinStoreError::ExporterDisabled {
                code: exporter.unique_code.clone(),
            });
        }
        self.registry
            .get(&exporter.exporter_type)
            .ok_or_else(|| FinStoreError::ExporterDisabled {
                code: exporter.unique_code.clone(),
            })
    }
}
