//! finstore keeps interval-tracked history of financial instruments.
//!
//! Overview
//! - Exporters are configured connectors to one external source/instrument.
//!   Their factories are registered explicitly at startup and resolved by the
//!   stored exporter type.
//! - Every download is folded into a set of non-overlapping "downloaded
//!   intervals" that record which dates were verified against the source,
//!   including stretches where the source had no values.
//! - Stored history is served back resampled over a date window, or composed
//!   pointwise with another exporter's history.
//!
//! Key behaviors
//! - Reconciliation of one exporter is serialized behind a per-exporter lock
//!   and applied through the record store as one unit.
//! - Exporter calls are bounded by the configured download timeout.
//! - Instrument lists and downloads go through an injected static data cache;
//!   downloads are dropped from it once persisted.
//! - Request dates become moments at local midnight in the configured timezone.
//!
//! Examples
//! Building the orchestrator and downloading a slice:
//! ```rust,ignore
//! use std::sync::Arc;
//! use finstore::{FinStore, HistoryQuery};
//! use finstore_mock::{MemoryStore, MockExporter};
//!
//! let fs = FinStore::builder()
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .with_factory(Arc::new(MockExporter::new()))
//!     .timezone(chrono_tz::Europe::Moscow)
//!     .build()?;
//!
//! let report = fs.download_history("MSCI_WORLD", from, to).await?;
//! let view = fs
//!     .history("MSCI_WORLD", from, to, HistoryQuery::new().fill_gaps(true))
//!     .await?;
//! ```
//!
//! See `finstore/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod ops;

pub use core::{FinStore, FinStoreBuilder};
pub use ops::history::HistoryQuery;

pub use finstore_cache::{HistoryKey, InstrumentsKey, StaticDataCache};
pub use finstore_types::{CacheConfig, FinStoreConfig};

// Re-export core types for convenience
pub use finstore_core::{
    ActualizeOutcome, ActualizeReport, Actuality, ApiActualityChecker, ArithmeticError,
    Capability, ComposeType, ComposeView, DateRange, Decimal, DownloadedInterval, ExporterFactory,
    ExporterId, ExporterRecord, ExporterRegistry, ExporterSummary, ExporterType, FinStoreError,
    HistoryExporter, HistoryView, InstrumentInfo, InstrumentsInfoExporter, IntervalId,
    IntervalOutcome, IntervalValuesType, NewExporter, RecordStore, SaveReport, SourceApiActuality,
    SourceApiActualityInfo, SourceApiStatus, StoredInterval, TimeSeriesPoint,
};
