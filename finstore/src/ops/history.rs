use chrono::NaiveDate;
use finstore_core::{
    ComposeType, ComposeView, FinStoreError, HistoryView, IntervalValuesType,
    ResampleWindow, TimeSeriesPoint, build_composed_sorted_history_data,
    build_sorted_history_data, zero_on_error,
};
use serde::{Deserialize, Serialize};

use crate::FinStore;

/// Presentation switches for history and compose queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Keep the time of day instead of collapsing each day to its latest value.
    pub intraday: bool,
    /// Produce one value per day, forward-filling days without a sample.
    pub fill_gaps: bool,
}

impl HistoryQuery {
    /// Day-granular query without gap filling.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            intraday: false,
            fill_gaps: false,
        }
    }

    /// Toggle intraday moments.
    #[must_use]
    pub const fn intraday(mut self, intraday: bool) -> Self {
        self.intraday = intraday;
        self
    }

    /// Toggle forward-filling of missing days.
    #[must_use]
    pub const fn fill_gaps(mut self, fill_gaps: bool) -> Self {
        self.fill_gaps = fill_gaps;
        self
    }
}

impl FinStore {
    fn window(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        values_type: IntervalValuesType,
        intraday: bool,
    ) -> Result<ResampleWindow, FinStoreError> {
        ResampleWindow::for_dates(self.cfg.timezone, date_from, date_to, values_type, intraday)
            .ok_or_else(|| {
                FinStoreError::InvalidArg(format!(
                    "dates {date_from}..{date_to} cannot be placed in {}",
                    self.cfg.timezone
                ))
            })
    }

    // Whole series: points before the window feed forward-filling and anchors.
    async fn stored_points(&self, code: &str) -> Result<Vec<TimeSeriesPoint>, FinStoreError> {
        let record = self.require_exporter(code).await?;
        self.store.get_points(record.id, None).await
    }

    /// Stored history of the exporter with `code`, resampled over
    /// `[date_from, date_to]` in the configured timezone.
    ///
    /// `fill_gaps` yields one value per day; otherwise only samples inside
    /// the window are returned. An inverted range or an exporter without
    /// points produces empty `data`.
    ///
    /// # Errors
    /// `NotFound` for an unknown code, or a store failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finstore::history::history", skip(self))
    )]
    pub async fn history(
        &self,
        code: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        query: HistoryQuery,
    ) -> Result<HistoryView, FinStoreError> {
        let values_type = if query.fill_gaps {
            IntervalValuesType::EveryDayValues
        } else {
            IntervalValuesType::OnlyInteriorValues
        };
        let window = self.window(date_from, date_to, values_type, query.intraday)?;
        let points = self.stored_points(code).await?;

        Ok(HistoryView {
            exporter_code: code.to_string(),
            date_from,
            date_to,
            intraday: query.intraday,
            data: build_sorted_history_data(points, &window).collect(),
        })
    }

    /// Pointwise composition of two exporters' histories.
    ///
    /// `fill_gaps` aligns both series on every day; otherwise each side may
    /// contribute its latest value from before the window. Failed arithmetic
    /// (division by zero, overflow) yields zero for that moment.
    ///
    /// # Errors
    /// `NotFound` when either code is unknown, or a store failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finstore::history::compose",
            skip(self),
            fields(compose_type = %compose_type),
        )
    )]
    pub async fn compose(
        &self,
        code1: &str,
        compose_type: ComposeType,
        code2: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        query: HistoryQuery,
    ) -> Result<ComposeView, FinStoreError> {
        let values_type = if query.fill_gaps {
            IntervalValuesType::EveryDayValues
        } else {
            IntervalValuesType::AllowPrecedingValue
        };
        let window = self.window(date_from, date_to, values_type, query.intraday)?;
        let (left, right) = futures::future::try_join(
            self.stored_points(code1),
            self.stored_points(code2),
        )
        .await?;

        let data = build_composed_sorted_history_data(
            left,
            right,
            compose_type,
            &window,
            zero_on_error,
        )
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|never| match never {});

        Ok(ComposeView {
            exporter1_code: code1.to_string(),
            exporter2_code: code2.to_string(),
            date_from,
            date_to,
            compose_type: compose_type.as_str().to_string(),
            intraday: query.intraday,
            data,
        })
    }
}
