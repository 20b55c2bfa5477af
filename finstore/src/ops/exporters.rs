use std::sync::Arc;

use chrono::NaiveDate;
use finstore_cache::InstrumentsKey;
use finstore_core::{
    Capability, ExporterId, ExporterRecord, ExporterSummary, ExporterType, FinStoreError,
    InstrumentInfo, NewExporter, evaluate_actuality,
};

use crate::FinStore;

impl FinStore {
    /// Every exporter with its downloaded intervals and freshness as of `today`.
    ///
    /// Exporters whose type is not registered are listed too, carrying an
    /// `error_message` that marks them disabled.
    ///
    /// # Errors
    /// Propagates store failures.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finstore::exporters::list_exporters", skip(self))
    )]
    pub async fn list_exporters(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ExporterSummary>, FinStoreError> {
        let records = self.store.exporters().await?;
        let intervals = futures::future::try_join_all(
            records.iter().map(|r| self.store.get_intervals(r.id)),
        )
        .await?;

        Ok(records
            .into_iter()
            .zip(intervals)
            .map(|(record, stored)| {
                let mut downloaded: Vec<_> = stored.into_iter().map(|s| s.interval).collect();
                downloaded.sort();
                let error_message = (!self.registry.contains(&record.exporter_type)).then(|| {
                    format!("exporter type {} is not registered", record.exporter_type)
                });
                ExporterSummary {
                    actuality: evaluate_actuality(today, &downloaded),
                    downloaded_intervals: downloaded,
                    record,
                    error_message,
                }
            })
            .collect())
    }

    /// Exporter by unique code.
    ///
    /// # Errors
    /// `NotFound` when no exporter has this code.
    pub async fn exporter_by_code(&self, code: &str) -> Result<ExporterRecord, FinStoreError> {
        self.require_exporter(code).await
    }

    /// Exporter by storage identity.
    ///
    /// # Errors
    /// `NotFound` when the id is unknown.
    pub async fn exporter_by_id(&self, id: ExporterId) -> Result<ExporterRecord, FinStoreError> {
        self.store
            .exporter_by_id(id)
            .await?
            .ok_or_else(|| FinStoreError::not_found(format!("exporter #{id}")))
    }

    /// True when no exporter other than `except` uses `code`.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn is_exporter_code_unique(
        &self,
        code: &str,
        except: Option<ExporterId>,
    ) -> Result<bool, FinStoreError> {
        Ok(match self.store.exporter_by_code(code).await? {
            None => true,
            Some(existing) => except == Some(existing.id),
        })
    }

    fn require_registered(&self, exporter_type: &ExporterType) -> Result<(), FinStoreError> {
        if self.registry.contains(exporter_type) {
            Ok(())
        } else {
            Err(FinStoreError::InvalidArg(format!(
                "exporter type {exporter_type} is not registered"
            )))
        }
    }

    /// Persist a new exporter.
    ///
    /// # Errors
    /// `InvalidArg` for an empty code or an unregistered type, `DuplicateCode`
    /// when the code is taken.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::exporters::create_exporter",
            skip(self, exporter),
            fields(code = %exporter.unique_code, exporter_type = %exporter.exporter_type),
        )
    )]
    pub async fn create_exporter(&self, exporter: NewExporter) -> Result<ExporterId, FinStoreError> {
        if exporter.unique_code.trim().is_empty() {
            return Err(FinStoreError::InvalidArg(
                "exporter code must not be empty".to_string(),
            ));
        }
        self.require_registered(&exporter.exporter_type)?;
        if !self.is_exporter_code_unique(&exporter.unique_code, None).await? {
            return Err(FinStoreError::DuplicateCode {
                code: exporter.unique_code,
            });
        }
        let id = self.store.insert_exporter(exporter).await?;
        #[cfg(feature = "tracing")]
        tracing::info!(exporter = %id, "exporter created");
        Ok(id)
    }

    /// Overwrite an existing exporter.
    ///
    /// Cached downloads of the exporter are dropped since its parameters may
    /// have changed.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `InvalidArg` for an unregistered type,
    /// `DuplicateCode` when the code belongs to another exporter.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::exporters::update_exporter",
            skip(self, exporter),
            fields(exporter = %exporter.id, code = %exporter.unique_code),
        )
    )]
    pub async fn update_exporter(&self, exporter: ExporterRecord) -> Result<(), FinStoreError> {
        self.require_registered(&exporter.exporter_type)?;
        if !self
            .is_exporter_code_unique(&exporter.unique_code, Some(exporter.id))
            .await?
        {
            return Err(FinStoreError::DuplicateCode {
                code: exporter.unique_code,
            });
        }
        let id = exporter.id;
        self.store.update_exporter(exporter).await?;
        if let Some(cache) = &self.cache {
            cache.invalidate_exporter(id).await;
        }
        Ok(())
    }

    /// Update the exporter carrying the same code, or create it.
    ///
    /// Returns `true` when a new exporter was created.
    ///
    /// # Errors
    /// Same as [`create_exporter`](Self::create_exporter) and
    /// [`update_exporter`](Self::update_exporter).
    pub async fn update_or_create_exporter(
        &self,
        exporter: NewExporter,
    ) -> Result<bool, FinStoreError> {
        match self.store.exporter_by_code(&exporter.unique_code).await? {
            Some(existing) => {
                self.update_exporter(exporter.with_id(existing.id)).await?;
                Ok(false)
            }
            None => {
                self.create_exporter(exporter).await?;
                Ok(true)
            }
        }
    }

    /// Delete an exporter with its history and downloaded intervals.
    ///
    /// # Errors
    /// `NotFound` when the id is unknown.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finstore::exporters::delete_exporter", skip(self))
    )]
    pub async fn delete_exporter(&self, id: ExporterId) -> Result<(), FinStoreError> {
        let lock = self.exporter_lock(id);
        let deleted = {
            let _guard = lock.lock().await;
            self.store.delete_exporter(id).await?
        };
        if !deleted {
            return Err(FinStoreError::not_found(format!("exporter #{id}")));
        }
        self.forget_lock(id);
        if let Some(cache) = &self.cache {
            cache.invalidate_exporter(id).await;
        }
        #[cfg(feature = "tracing")]
        tracing::info!(exporter = %id, "exporter deleted");
        Ok(())
    }

    /// Instruments a registered exporter type offers for `parameters`.
    ///
    /// Served from the static data cache when enabled.
    ///
    /// # Errors
    /// `NotFound` for an unregistered type, `Unsupported` when the factory
    /// cannot list instruments, `DownloadTimeout` when the source is too slow,
    /// or the exporter's own error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::exporters::available_instruments",
            skip(self, parameters),
            fields(exporter_type = %exporter_type),
        )
    )]
    pub async fn available_instruments(
        &self,
        exporter_type: &ExporterType,
        parameters: &serde_json::Value,
    ) -> Result<Arc<Vec<InstrumentInfo>>, FinStoreError> {
        let factory = self
            .registry
            .get(exporter_type)
            .ok_or_else(|| FinStoreError::not_found(format!("exporter type {exporter_type}")))?;
        let lister = factory
            .as_instruments_info_exporter()
            .ok_or_else(|| FinStoreError::unsupported(Capability::Instruments.as_str()))?;
        let name = factory.name();
        let timeout = self.cfg.download_timeout;
        let load = || {
            Self::exporter_call_with_timeout(
                name,
                Capability::Instruments.as_str(),
                timeout,
                lister.export_instruments(parameters),
            )
        };
        match &self.cache {
            Some(cache) => {
                cache
                    .instruments(InstrumentsKey::new(exporter_type.clone(), parameters), load)
                    .await
            }
            None => load().await.map(Arc::new),
        }
    }
}
