//! finstore-core
//!
//! Contracts and pure computations shared across the finstore workspace.
//!
//! - `types`: common data structures (points, intervals, exporter records, reports).
//! - `exporter`: the `ExporterFactory` trait and its role traits.
//! - `registry`: explicit mapping from exporter type to factory.
//! - `store`: the `RecordStore` persistence contract.
//! - `timeseries`: reconciliation, resampling, composition and actuality.
//!
//! Nothing in this crate performs I/O, logs, or retries. Interval
//! reconciliation asserts its input contract and panics on misuse; callers
//! validate arguments before reaching it.
#![warn(missing_docs)]

/// Exporter factory trait and role traits.
pub mod exporter;
/// Startup-populated exporter factory registry.
pub mod registry;
/// Persistence contract.
pub mod store;
/// Time-series computations.
pub mod timeseries;
pub mod types;

pub use exporter::{ApiActualityChecker, ExporterFactory, HistoryExporter, InstrumentsInfoExporter};
pub use registry::ExporterRegistry;
pub use store::RecordStore;
pub use timeseries::actuality::{evaluate_actuality, is_actual, last_business_day};
pub use timeseries::compose::{
    ArithmeticError, ComposeType, ComposedValues, build_composed_sorted_history_data,
    zero_on_error,
};
pub use timeseries::reconcile::{ReconcilePlan, reconcile};
pub use timeseries::resample::{
    HistoryValues, IntervalValuesType, ResampleWindow, build_sorted_history_data, local_day_start,
};
pub use types::*;
