//! Deterministic doubles for finstore tests and examples.
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use finstore_core::exporter::{
    ApiActualityChecker, ExporterFactory, HistoryExporter, InstrumentsInfoExporter,
};
use finstore_core::{FinStoreError, InstrumentInfo, TimeSeriesPoint};
use rust_decimal::Decimal;

mod dynamic;
mod fixtures;
mod store;

pub use dynamic::{DynamicMockController, DynamicMockExporter, HistoryRequestLog, MockBehavior};
pub use store::MemoryStore;

/// Exporter type under which [`MockExporter`] registers.
pub const MOCK_EXPORTER_TYPE: &str = "finstore-mock";

/// Fixture-backed exporter factory for CI-safe examples.
///
/// History parameters carry the instrument in a `code` field. Fixture points
/// sit at midnight in the offset of the requested window.
pub struct MockExporter;

impl Default for MockExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExporter {
    /// Create the exporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn code(parameters: &serde_json::Value) -> Result<&str, FinStoreError> {
        parameters
            .get("code")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| FinStoreError::InvalidArg("history parameters lack a code".into()))
    }

    async fn maybe_fail_or_stall(code: &str, capability: &str) -> Result<(), FinStoreError> {
        match code {
            "FAIL" => Err(FinStoreError::exporter(
                MOCK_EXPORTER_TYPE,
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl ExporterFactory for MockExporter {
    fn name(&self) -> &'static str {
        MOCK_EXPORTER_TYPE
    }

    fn as_history_exporter(&self) -> Option<&dyn HistoryExporter> {
        Some(self as &dyn HistoryExporter)
    }

    fn as_instruments_info_exporter(&self) -> Option<&dyn InstrumentsInfoExporter> {
        Some(self as &dyn InstrumentsInfoExporter)
    }

    fn as_api_actuality_checker(&self) -> Option<&dyn ApiActualityChecker> {
        Some(self as &dyn ApiActualityChecker)
    }
}

#[async_trait]
impl HistoryExporter for MockExporter {
    async fn export_history(
        &self,
        parameters: &serde_json::Value,
        moment_from: DateTime<FixedOffset>,
        moment_to: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeSeriesPoint>, FinStoreError> {
        let code = Self::code(parameters)?;
        Self::maybe_fail_or_stall(code, "history").await?;
        let rows = fixtures::history::by_code(code)
            .ok_or_else(|| FinStoreError::not_found(format!("mock instrument {code}")))?;
        let offset = *moment_from.offset();
        let mut out = Vec::with_capacity(rows.len());
        for (date, value) in rows {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| FinStoreError::Data(e.to_string()))?;
            let value = Decimal::from_str(value).map_err(|e| FinStoreError::Data(e.to_string()))?;
            let Some(moment) = date
                .and_hms_opt(0, 0, 0)
                .and_then(|naive| naive.and_local_timezone(offset).single())
            else {
                continue;
            };
            if moment_from <= moment && moment <= moment_to {
                out.push(TimeSeriesPoint::new(moment, value));
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl InstrumentsInfoExporter for MockExporter {
    async fn export_instruments(
        &self,
        parameters: &serde_json::Value,
    ) -> Result<Vec<InstrumentInfo>, FinStoreError> {
        if let Ok(code) = Self::code(parameters) {
            Self::maybe_fail_or_stall(code, "instruments").await?;
        }
        Ok(fixtures::instruments::all()
            .iter()
            .map(|(code, name)| InstrumentInfo {
                code: (*code).to_string(),
                name: (*name).to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl ApiActualityChecker for MockExporter {
    async fn check(&self) -> Result<(), FinStoreError> {
        Ok(())
    }
}
