//! Re-export of the shared data types from `finstore-types`.
// Downstream crates can depend on `finstore-core` only.

pub use finstore_types::{
    ActualizeOutcome, ActualizeReport, Actuality, CacheConfig, Capability, ComposeView,
    DateRange, DownloadedInterval, ExporterId, ExporterRecord, ExporterSummary, ExporterType,
    FinStoreConfig, FinStoreError, HistoryView, InstrumentInfo, IntervalId, IntervalOutcome,
    IntervalWrite, NewExporter, SaveReport, SourceApiActuality, SourceApiActualityInfo,
    SourceApiStatus, StoredInterval, TimeSeriesPoint,
};

pub use rust_decimal::Decimal;
