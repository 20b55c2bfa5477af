use std::sync::Arc;

use chrono::{Days, NaiveDate};
use finstore_cache::HistoryKey;
use finstore_core::{
    ActualizeOutcome, ActualizeReport, Capability, ExporterId, FinStoreError, SaveReport,
    TimeSeriesPoint, reconcile,
};

use crate::FinStore;

impl FinStore {
    /// Persist one downloaded slice and fold `[date_from, date_to]` into the
    /// exporter's downloaded intervals.
    ///
    /// Reconciliations of the same exporter are serialized; different
    /// exporters proceed in parallel.
    ///
    /// # Errors
    /// `InvalidArg` when there are no points and `date_from > date_to`,
    /// `NotFound` for an unknown exporter, or a store failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::download::save_history_data",
            skip(self, points),
            fields(points = points.len()),
        )
    )]
    pub async fn save_history_data(
        &self,
        exporter: ExporterId,
        points: Vec<TimeSeriesPoint>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<SaveReport, FinStoreError> {
        if points.is_empty() && date_from > date_to {
            return Err(FinStoreError::InvalidArg(format!(
                "date_from {date_from} is after date_to {date_to}"
            )));
        }
        self.exporter_by_id(exporter).await?;

        let lock = self.exporter_lock(exporter);
        let _guard = lock.lock().await;

        let existing = self.store.get_intervals(exporter).await?;
        let plan = reconcile(&existing, points, date_from, date_to);
        self.store.apply_reconciliation(exporter, &plan).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            exporter = %exporter,
            from = %plan.date_from,
            to = %plan.date_to,
            points = plan.points.len(),
            outcome = ?plan.outcome,
            "history slice saved"
        );

        Ok(SaveReport {
            exporter,
            date_from: plan.date_from,
            date_to: plan.date_to,
            points_saved: plan.points.len(),
            outcome: plan.outcome,
            intervals: plan.updated_intervals(&existing),
        })
    }

    /// Download `[date_from, date_to]` for the exporter with `code` and save it.
    ///
    /// The window runs from local midnight of `date_from` to local midnight of
    /// `date_to` in the configured timezone. The download goes through the
    /// history cache and is dropped from it once persisted.
    ///
    /// # Errors
    /// `InvalidArg` for an inverted range, `NotFound` for an unknown code,
    /// `ExporterDisabled` for inactive or unregistered exporters, `Unsupported`
    /// when the factory cannot download history, `DownloadTimeout`, or the
    /// exporter's own error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finstore::download::download_history", skip(self))
    )]
    pub async fn download_history(
        &self,
        code: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<SaveReport, FinStoreError> {
        if date_from > date_to {
            return Err(FinStoreError::InvalidArg(format!(
                "date_from {date_from} is after date_to {date_to}"
            )));
        }
        let record = self.require_exporter(code).await?;
        let factory = self.enabled_factory(&record)?;
        let downloader = factory
            .as_history_exporter()
            .ok_or_else(|| FinStoreError::unsupported(Capability::History.as_str()))?;

        let moment_from = self.moment_at(date_from)?;
        let moment_to = self.moment_at(date_to)?;
        let key = HistoryKey::new(record.id, moment_from, moment_to);
        let name = factory.name();
        let timeout = self.cfg.download_timeout;
        let parameters = &record.download_history_parameters;
        let load = || {
            Self::exporter_call_with_timeout(
                name,
                Capability::History.as_str(),
                timeout,
                downloader.export_history(parameters, moment_from, moment_to),
            )
        };

        let points = match &self.cache {
            Some(cache) => Arc::unwrap_or_clone(cache.history(key.clone(), load).await?),
            None => load().await?,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(code, points = points.len(), "history downloaded");

        let report = self
            .save_history_data(record.id, points, date_from, date_to)
            .await;
        if let Some(cache) = &self.cache {
            cache.drop_history(&key).await;
        }
        report
    }

    /// Bring the exporter's history up to `today`.
    ///
    /// Fetches from the day after the latest downloaded date through `today`.
    /// An exporter without any history only gets the last `bootstrap_days`
    /// days ending `today`.
    ///
    /// # Errors
    /// Same as [`download_history`](Self::download_history).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finstore::download::actualize_history", skip(self))
    )]
    pub async fn actualize_history(
        &self,
        code: &str,
        today: NaiveDate,
    ) -> Result<ActualizeReport, FinStoreError> {
        let record = self.require_exporter(code).await?;
        self.enabled_factory(&record)?;

        let last_date = self
            .store
            .get_intervals(record.id)
            .await?
            .iter()
            .map(|s| s.interval.date_to)
            .max();

        let (date_from, outcome) = match last_date {
            Some(last) if last >= today => {
                #[cfg(feature = "tracing")]
                tracing::info!(code, "history already actual");
                return Ok(ActualizeReport {
                    exporter_code: record.unique_code,
                    outcome: ActualizeOutcome::AlreadyActual,
                    save: None,
                });
            }
            Some(last) => (
                last.succ_opt().unwrap_or(last),
                ActualizeOutcome::Actualized,
            ),
            None => (
                today
                    .checked_sub_days(Days::new(u64::from(self.cfg.bootstrap_days.saturating_sub(1))))
                    .unwrap_or(today),
                ActualizeOutcome::Bootstrapped,
            ),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(code, from = %date_from, to = %today, outcome = ?outcome, "actualizing history");

        let save = self.download_history(code, date_from, today).await?;
        Ok(ActualizeReport {
            exporter_code: record.unique_code,
            outcome,
            save: Some(save),
        })
    }
}
