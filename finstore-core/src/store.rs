//! Persistence contract consumed by the orchestrator.

use async_trait::async_trait;

use crate::FinStoreError;
use crate::timeseries::reconcile::ReconcilePlan;
use finstore_types::{
    DateRange, ExporterId, ExporterRecord, IntervalId, IntervalWrite, NewExporter,
    SourceApiActuality, StoredInterval, TimeSeriesPoint,
};

/// Record store owning exporters, their history points, downloaded intervals,
/// and source API check results.
///
/// The computing core never talks to the store; the orchestrator reads the
/// current state, computes a [`ReconcilePlan`] and hands it back here.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All exporter records, ascending by id.
    async fn exporters(&self) -> Result<Vec<ExporterRecord>, FinStoreError>;

    /// Exporter by storage identity.
    async fn exporter_by_id(&self, id: ExporterId)
    -> Result<Option<ExporterRecord>, FinStoreError>;

    /// Exporter by unique code.
    async fn exporter_by_code(&self, code: &str) -> Result<Option<ExporterRecord>, FinStoreError>;

    /// Insert an exporter; the store assigns its identity.
    ///
    /// # Errors
    /// Returns `DuplicateCode` when the unique code is already taken.
    async fn insert_exporter(&self, exporter: NewExporter) -> Result<ExporterId, FinStoreError>;

    /// Overwrite an existing exporter record.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id and `DuplicateCode` when the new code
    /// collides with another exporter.
    async fn update_exporter(&self, exporter: ExporterRecord) -> Result<(), FinStoreError>;

    /// Delete an exporter together with its points and intervals.
    /// Returns `false` when nothing was deleted.
    async fn delete_exporter(&self, id: ExporterId) -> Result<bool, FinStoreError>;

    /// Downloaded intervals of an exporter, ascending by id.
    async fn get_intervals(&self, exporter: ExporterId)
    -> Result<Vec<StoredInterval>, FinStoreError>;

    /// Delete `to_delete` and apply `to_upsert` to the exporter's intervals.
    async fn replace_intervals(
        &self,
        exporter: ExporterId,
        to_delete: &[IntervalId],
        to_upsert: &[IntervalWrite],
    ) -> Result<(), FinStoreError>;

    /// Insert-or-overwrite points by moment.
    async fn upsert_points(
        &self,
        exporter: ExporterId,
        points: &[TimeSeriesPoint],
    ) -> Result<(), FinStoreError>;

    /// Points of an exporter, ascending by moment, optionally limited to a date range.
    async fn get_points(
        &self,
        exporter: ExporterId,
        range: Option<DateRange>,
    ) -> Result<Vec<TimeSeriesPoint>, FinStoreError>;

    /// Stored source API check results.
    async fn source_api_actualities(&self) -> Result<Vec<SourceApiActuality>, FinStoreError>;

    /// Insert or overwrite the check result for `record.exporter_type`.
    async fn upsert_source_api_actuality(
        &self,
        record: SourceApiActuality,
    ) -> Result<(), FinStoreError>;

    /// Apply a reconciliation plan.
    ///
    /// Stores with transactions should override this to write intervals and
    /// points as one unit. The default issues the two writes in sequence.
    async fn apply_reconciliation(
        &self,
        exporter: ExporterId,
        plan: &ReconcilePlan,
    ) -> Result<(), FinStoreError> {
        if !plan.to_delete.is_empty() || !plan.to_upsert.is_empty() {
            self.replace_intervals(exporter, &plan.to_delete, &plan.to_upsert)
                .await?;
        }
        if !plan.points.is_empty() {
            self.upsert_points(exporter, &plan.points).await?;
        }
        Ok(())
    }
}
