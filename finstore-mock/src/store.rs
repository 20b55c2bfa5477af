use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use finstore_core::store::RecordStore;
use finstore_core::{
    DateRange, ExporterId, ExporterRecord, FinStoreError, IntervalId, IntervalWrite, NewExporter,
    ReconcilePlan, SourceApiActuality, StoredInterval, TimeSeriesPoint,
};

#[derive(Default)]
struct State {
    exporters: BTreeMap<ExporterId, ExporterRecord>,
    intervals: BTreeMap<ExporterId, Vec<StoredInterval>>,
    points: BTreeMap<ExporterId, BTreeMap<DateTime<Utc>, TimeSeriesPoint>>,
    actualities: Vec<SourceApiActuality>,
    next_exporter_id: u64,
    next_interval_id: u64,
}

impl State {
    fn code_taken(&self, code: &str, except: Option<ExporterId>) -> bool {
        self.exporters
            .values()
            .any(|e| e.unique_code == code && Some(e.id) != except)
    }

    fn check_exporter(&self, exporter: ExporterId) -> Result<(), FinStoreError> {
        if self.exporters.contains_key(&exporter) {
            Ok(())
        } else {
            Err(FinStoreError::not_found(format!("exporter #{exporter}")))
        }
    }

    fn check_interval_writes(
        &self,
        exporter: ExporterId,
        to_delete: &[IntervalId],
        to_upsert: &[IntervalWrite],
    ) -> Result<(), FinStoreError> {
        self.check_exporter(exporter)?;
        let owned = self.intervals.get(&exporter);
        let owns = |id: IntervalId| owned.is_some_and(|v| v.iter().any(|s| s.id == id));
        if let Some(id) = to_delete.iter().copied().find(|id| !owns(*id)) {
            return Err(FinStoreError::Store(format!(
                "interval #{} does not belong to exporter #{exporter}",
                id.0
            )));
        }
        for w in to_upsert {
            let interval = w.interval();
            if interval.date_from > interval.date_to {
                return Err(FinStoreError::Store(format!(
                    "inverted interval {}..{}",
                    interval.date_from, interval.date_to
                )));
            }
            if let IntervalWrite::Update { id, .. } = *w
                && !owns(id)
            {
                return Err(FinStoreError::Store(format!(
                    "interval #{} does not belong to exporter #{exporter}",
                    id.0
                )));
            }
        }
        Ok(())
    }

    fn write_intervals(
        &mut self,
        exporter: ExporterId,
        to_delete: &[IntervalId],
        to_upsert: &[IntervalWrite],
    ) {
        let mut next_id = self.next_interval_id;
        let list = self.intervals.entry(exporter).or_default();
        list.retain(|s| !to_delete.contains(&s.id));
        for w in to_upsert {
            match *w {
                IntervalWrite::Create(interval) => {
                    next_id += 1;
                    list.push(StoredInterval::new(IntervalId(next_id), interval));
                }
                IntervalWrite::Update { id, interval } => {
                    if let Some(s) = list.iter_mut().find(|s| s.id == id) {
                        s.interval = interval;
                    }
                }
            }
        }
        list.sort_by_key(|s| s.id);
        self.next_interval_id = next_id;
    }

    fn write_points(&mut self, exporter: ExporterId, points: &[TimeSeriesPoint]) {
        let stored = self.points.entry(exporter).or_default();
        for p in points {
            stored.insert(p.moment.with_timezone(&Utc), p.clone());
        }
    }
}

/// In-memory [`RecordStore`].
///
/// Identities are handed out sequentially starting at 1. Reconciliation plans
/// are validated and applied under a single lock.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points of an exporter.
    pub async fn point_count(&self, exporter: ExporterId) -> usize {
        let guard = self.state.lock().await;
        guard.points.get(&exporter).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn exporters(&self) -> Result<Vec<ExporterRecord>, FinStoreError> {
        let guard = self.state.lock().await;
        Ok(guard.exporters.values().cloned().collect())
    }

    async fn exporter_by_id(&self, id: ExporterId) -> Result<Option<ExporterRecord>, FinStoreError> {
        let guard = self.state.lock().await;
        Ok(guard.exporters.get(&id).cloned())
    }

    async fn exporter_by_code(&self, code: &str) -> Result<Option<ExporterRecord>, FinStoreError> {
        let guard = self.state.lock().await;
        Ok(guard
            .exporters
            .values()
            .find(|e| e.unique_code == code)
            .cloned())
    }

    async fn insert_exporter(&self, exporter: NewExporter) -> Result<ExporterId, FinStoreError> {
        let mut guard = self.state.lock().await;
        if guard.code_taken(&exporter.unique_code, None) {
            return Err(FinStoreError::DuplicateCode {
                code: exporter.unique_code,
            });
        }
        guard.next_exporter_id += 1;
        let id = ExporterId(guard.next_exporter_id);
        guard.exporters.insert(id, exporter.with_id(id));
        Ok(id)
    }

    async fn update_exporter(&self, exporter: ExporterRecord) -> Result<(), FinStoreError> {
        let mut guard = self.state.lock().await;
        guard.check_exporter(exporter.id)?;
        if guard.code_taken(&exporter.unique_code, Some(exporter.id)) {
            return Err(FinStoreError::DuplicateCode {
                code: exporter.unique_code,
            });
        }
        guard.exporters.insert(exporter.id, exporter);
        Ok(())
    }

    async fn delete_exporter(&self, id: ExporterId) -> Result<bool, FinStoreError> {
        let mut guard = self.state.lock().await;
        let existed = guard.exporters.remove(&id).is_some();
        guard.intervals.remove(&id);
        guard.points.remove(&id);
        Ok(existed)
    }

    async fn get_intervals(&self, exporter: ExporterId) -> Result<Vec<StoredInterval>, FinStoreError> {
        let guard = self.state.lock().await;
        guard.check_exporter(exporter)?;
        Ok(guard.intervals.get(&exporter).cloned().unwrap_or_default())
    }

    async fn replace_intervals(
        &self,
        exporter: ExporterId,
        to_delete: &[IntervalId],
        to_upsert: &[IntervalWrite],
    ) -> Result<(), FinStoreError> {
        let mut guard = self.state.lock().await;
        guard.check_interval_writes(exporter, to_delete, to_upsert)?;
        guard.write_intervals(exporter, to_delete, to_upsert);
        Ok(())
    }

    async fn upsert_points(
        &self,
        exporter: ExporterId,
        points: &[TimeSeriesPoint],
    ) -> Result<(), FinStoreError> {
        let mut guard = self.state.lock().await;
        guard.check_exporter(exporter)?;
        guard.write_points(exporter, points);
        Ok(())
    }

    async fn get_points(
        &self,
        exporter: ExporterId,
        range: Option<DateRange>,
    ) -> Result<Vec<TimeSeriesPoint>, FinStoreError> {
        let guard = self.state.lock().await;
        guard.check_exporter(exporter)?;
        Ok(guard
            .points
            .get(&exporter)
            .map(|m| {
                m.values()
                    .filter(|p| range.is_none_or(|r| r.contains(p.date())))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn source_api_actualities(&self) -> Result<Vec<SourceApiActuality>, FinStoreError> {
        let guard = self.state.lock().await;
        Ok(guard.actualities.clone())
    }

    async fn upsert_source_api_actuality(
        &self,
        record: SourceApiActuality,
    ) -> Result<(), FinStoreError> {
        let mut guard = self.state.lock().await;
        if let Some(i) = guard
            .actualities
            .iter()
            .position(|a| a.exporter_type == record.exporter_type)
        {
            guard.actualities[i] = record;
        } else {
            guard.actualities.push(record);
        }
        Ok(())
    }

    async fn apply_reconciliation(
        &self,
        exporter: ExporterId,
        plan: &ReconcilePlan,
    ) -> Result<(), FinStoreError> {
        let mut guard = self.state.lock().await;
        guard.check_interval_writes(exporter, &plan.to_delete, &plan.to_upsert)?;
        guard.write_intervals(exporter, &plan.to_delete, &plan.to_upsert);
        guard.write_points(exporter, &plan.points);
        Ok(())
    }
}
