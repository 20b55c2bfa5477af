use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::FinStoreError;
use finstore_types::{ExporterType, InstrumentInfo, TimeSeriesPoint};

/// Focused role trait for factories that download history values.
#[async_trait]
pub trait HistoryExporter: Send + Sync {
    /// Download every value the source has for `parameters` inside
    /// `[moment_from, moment_to]`.
    ///
    /// Sources may return points slightly outside the requested window; the
    /// reconciler widens the claimed range to cover them.
    async fn export_history(
        &self,
        parameters: &serde_json::Value,
        moment_from: DateTime<FixedOffset>,
        moment_to: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeSeriesPoint>, FinStoreError>;
}

/// Focused role trait for factories that list the instruments a source offers.
#[async_trait]
pub trait InstrumentsInfoExporter: Send + Sync {
    /// List instruments available for the given info parameters.
    async fn export_instruments(
        &self,
        parameters: &serde_json::Value,
    ) -> Result<Vec<InstrumentInfo>, FinStoreError>;
}

/// Focused role trait for factories that can probe their remote API.
#[async_trait]
pub trait ApiActualityChecker: Send + Sync {
    /// Succeeds when the remote API still answers the way the exporter expects.
    async fn check(&self) -> Result<(), FinStoreError>;
}

/// Exporter factory: one kind of external financial-data source.
///
/// Factories are registered explicitly at startup and resolved by their
/// [`ExporterType`]; each role is advertised through an `as_*` accessor.
pub trait ExporterFactory: Send + Sync {
    /// A stable identifier persisted with exporter records (e.g. "msci-index").
    fn name(&self) -> &'static str;

    /// Typed registry key constructed from the static name.
    fn exporter_type(&self) -> ExporterType {
        ExporterType::new(self.name())
    }

    /// Advertise history capability by returning a usable trait object reference when supported.
    fn as_history_exporter(&self) -> Option<&dyn HistoryExporter> {
        None
    }

    /// If implemented, returns a trait object listing available instruments.
    fn as_instruments_info_exporter(&self) -> Option<&dyn InstrumentsInfoExporter> {
        None
    }

    /// If implemented, returns a trait object probing the remote API.
    fn as_api_actuality_checker(&self) -> Option<&dyn ApiActualityChecker> {
        None
    }
}
