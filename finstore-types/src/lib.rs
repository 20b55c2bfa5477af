//! finstore-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod exporter;
mod interval;
mod point;
mod reports;

pub use capability::Capability;
pub use config::{CacheConfig, FinStoreConfig};
pub use error::FinStoreError;
pub use exporter::{
    ExporterId, ExporterRecord, ExporterType, InstrumentInfo, NewExporter, SourceApiActuality,
};
pub use interval::{DateRange, DownloadedInterval, IntervalId, IntervalWrite, StoredInterval};
pub use point::TimeSeriesPoint;
pub use reports::{
    ActualizeOutcome, ActualizeReport, Actuality, ComposeView, ExporterSummary, HistoryView,
    IntervalOutcome, SaveReport, SourceApiActualityInfo, SourceApiStatus,
};
