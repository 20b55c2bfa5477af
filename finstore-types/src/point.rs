//! A single sample of an instrument's history.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `(moment, value)` sample of an instrument's history (price, NAV, rate).
///
/// The moment keeps the UTC offset it was recorded with, so [`date`](Self::date)
/// reports the calendar date the source meant. Ordering and equality of moments
/// compare instants, not wall-clock readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Timezone-aware timestamp of the sample.
    pub moment: DateTime<FixedOffset>,
    /// High-precision decimal value.
    pub value: Decimal,
}

impl TimeSeriesPoint {
    /// Construct a point.
    #[must_use]
    pub const fn new(moment: DateTime<FixedOffset>, value: Decimal) -> Self {
        Self { moment, value }
    }

    /// Local calendar date of the sample.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.moment.date_naive()
    }
}
