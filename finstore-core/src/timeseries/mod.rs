//! Pure time-series computations over in-memory collections.
//!
//! Modules include:
//! - `reconcile`: merge a downloaded slice into the downloaded interval set
//! - `resample`: select, collapse and gap-fill values inside a window
//! - `compose`: pointwise arithmetic over two resampled series
//! - `actuality`: business-day freshness of stored history
/// Business-day freshness checks.
pub mod actuality;
/// Pointwise composition of two series.
pub mod compose;
/// Downloaded interval reconciliation.
pub mod reconcile;
/// Window selection and daily gap filling.
pub mod resample;
