// Shared fixtures so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use finstore::{
    DownloadedInterval, ExporterFactory, ExporterType, FinStore, FinStoreBuilder, NewExporter,
    TimeSeriesPoint,
};
use finstore_mock::{DynamicMockController, DynamicMockExporter, MemoryStore, MockExporter};
use rust_decimal::Decimal;

/// Exporter type of the scriptable mock.
pub const DYN: &str = "dyn";

/// Parse a `YYYY-MM-DD` date.
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

/// Point at UTC midnight of `date`.
pub fn pt(date: &str, value: i64) -> TimeSeriesPoint {
    pt_at(&format!("{date}T00:00:00+00:00"), value)
}

/// Point at an exact RFC 3339 moment.
pub fn pt_at(moment: &str, value: i64) -> TimeSeriesPoint {
    TimeSeriesPoint::new(
        DateTime::parse_from_rfc3339(moment).expect("valid moment"),
        Decimal::from(value),
    )
}

/// Interval shorthand.
pub fn iv(from: &str, to: &str) -> DownloadedInterval {
    DownloadedInterval::new(d(from), d(to))
}

/// New exporter of `exporter_type` whose history parameters carry `instrument`.
pub fn new_exporter(code: &str, exporter_type: &str, instrument: &str) -> NewExporter {
    NewExporter {
        unique_code: code.to_string(),
        description: format!("{code} test exporter"),
        is_active: true,
        exporter_type: ExporterType::from(exporter_type),
        download_info_parameters: serde_json::Value::Null,
        download_history_parameters: serde_json::json!({ "code": instrument }),
    }
}

/// Fixture-backed exporter record for `instrument`.
pub fn mock_exporter(code: &str, instrument: &str) -> NewExporter {
    new_exporter(code, finstore_mock::MOCK_EXPORTER_TYPE, instrument)
}

/// Builder with a fresh memory store and the fixture mock registered.
pub fn builder(store: &Arc<MemoryStore>) -> FinStoreBuilder {
    FinStore::builder()
        .with_store(Arc::clone(store) as Arc<dyn finstore::RecordStore>)
        .with_factory(Arc::new(MockExporter::new()))
}

/// Orchestrator over a fresh store with the fixture mock registered.
pub fn fin_store() -> (FinStore, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let fs = builder(&store).build().expect("valid configuration");
    (fs, store)
}

/// Orchestrator with both the fixture mock and a scriptable mock registered.
pub fn fin_store_with_dynamic() -> (FinStore, Arc<MemoryStore>, DynamicMockController) {
    let store = Arc::new(MemoryStore::new());
    let (dynamic, controller): (Arc<dyn ExporterFactory>, _) =
        DynamicMockExporter::new_with_controller(DYN);
    let fs = builder(&store)
        .with_factory(dynamic)
        .build()
        .expect("valid configuration");
    (fs, store, controller)
}

/// Dates of the points, formatted for compact assertions.
pub fn dates(points: &[TimeSeriesPoint]) -> Vec<String> {
    points.iter().map(|p| p.date().to_string()).collect()
}

/// Values of the points as strings.
pub fn values(points: &[TimeSeriesPoint]) -> Vec<String> {
    points.iter().map(|p| p.value.to_string()).collect()
}
