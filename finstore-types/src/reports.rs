//! Report envelopes produced by the orchestrator and the computing core.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::exporter::{ExporterId, ExporterRecord, ExporterType};
use crate::interval::DownloadedInterval;
use crate::point::TimeSeriesPoint;

/// What a reconciliation did to the downloaded interval set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalOutcome {
    /// A fresh interval was created over virgin territory.
    Created,
    /// The affected intervals were merged into one survivor.
    Merged {
        /// Number of intervals deleted because the survivor absorbed them.
        absorbed: usize,
    },
    /// Nothing was recorded (empty download not proven by prior coverage).
    Unchanged,
}

/// Freshness of an exporter's stored history relative to the last business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actuality {
    /// Most recent completed business day as seen from "today".
    pub last_business_day: NaiveDate,
    /// Latest `date_to` among the downloaded intervals, if any.
    pub last_downloaded: Option<NaiveDate>,
    /// True when the history reaches the last business day.
    pub is_actual: bool,
    /// True when the downloaded intervals are not one contiguous range.
    pub has_gaps: bool,
}

/// Summary of persisting one downloaded slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    /// Exporter the slice belongs to.
    pub exporter: ExporterId,
    /// Claimed range after widening to cover every point.
    pub date_from: NaiveDate,
    /// Claimed range after widening to cover every point.
    pub date_to: NaiveDate,
    /// Number of points upserted.
    pub points_saved: usize,
    /// Effect on the downloaded interval set.
    pub outcome: IntervalOutcome,
    /// Downloaded intervals after the save, ascending.
    pub intervals: Vec<DownloadedInterval>,
}

/// How an actualization request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActualizeOutcome {
    /// History already reached "today"; nothing was fetched.
    AlreadyActual,
    /// The gap after the last downloaded date was fetched.
    Actualized,
    /// The exporter had no history; only the bootstrap window was fetched.
    Bootstrapped,
}

/// Summary of an actualization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualizeReport {
    /// Unique code of the exporter.
    pub exporter_code: String,
    /// How the request was served.
    pub outcome: ActualizeOutcome,
    /// Persisting summary when something was fetched.
    pub save: Option<SaveReport>,
}

/// Exporter record enriched with its interval state for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterSummary {
    /// Persisted record.
    pub record: ExporterRecord,
    /// Downloaded intervals, ascending.
    pub downloaded_intervals: Vec<DownloadedInterval>,
    /// Freshness of the stored history.
    pub actuality: Actuality,
    /// Set when the exporter cannot be used (e.g. its type is not registered).
    pub error_message: Option<String>,
}

impl ExporterSummary {
    /// True when the exporter cannot be downloaded.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Result status of the last source API probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceApiStatus {
    /// Never checked.
    Unknown,
    /// Last check failed.
    Failed,
    /// Last check succeeded.
    Valid,
}

/// Source API actuality merged with registry knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceApiActualityInfo {
    /// Registry id for registered types; negated storage position otherwise.
    pub id: i64,
    /// Exporter type.
    pub exporter_type: ExporterType,
    /// False when the type is stored but no longer registered.
    pub registered: bool,
    /// Error text of the last failed check.
    pub check_error_message: Option<String>,
    /// When the last check ran.
    pub last_check_moment: Option<DateTime<Utc>>,
}

impl SourceApiActualityInfo {
    /// Status derived from the stored check.
    #[must_use]
    pub const fn status(&self) -> SourceApiStatus {
        if self.last_check_moment.is_none() {
            return SourceApiStatus::Unknown;
        }
        if self.check_error_message.is_some() {
            return SourceApiStatus::Failed;
        }
        SourceApiStatus::Valid
    }

    /// True when the type is stored but unknown to the registry.
    #[must_use]
    pub const fn not_found(&self) -> bool {
        !self.registered
    }
}

/// Resampled history of one exporter over a date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryView {
    /// Unique code of the exporter.
    pub exporter_code: String,
    /// First requested date.
    pub date_from: NaiveDate,
    /// Last requested date.
    pub date_to: NaiveDate,
    /// Whether moments keep their time of day.
    pub intraday: bool,
    /// Sorted values.
    pub data: Vec<TimeSeriesPoint>,
}

/// Pointwise composition of two exporters' histories over a date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeView {
    /// Unique code of the left operand.
    pub exporter1_code: String,
    /// Unique code of the right operand.
    pub exporter2_code: String,
    /// First requested date.
    pub date_from: NaiveDate,
    /// Last requested date.
    pub date_to: NaiveDate,
    /// Operator label (`add`, `subtract`, `multiply`, `divide`).
    pub compose_type: String,
    /// Whether moments keep their time of day.
    pub intraday: bool,
    /// Sorted composed values.
    pub data: Vec<TimeSeriesPoint>,
}
