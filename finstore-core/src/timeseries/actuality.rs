use chrono::{Datelike, Days, NaiveDate, Weekday};
use finstore_types::{Actuality, DownloadedInterval};

/// Most recent completed business day as seen from `today`.
///
/// Monday looks back to Friday, Sunday to Friday, every other day to yesterday.
#[must_use]
pub fn last_business_day(today: NaiveDate) -> NaiveDate {
    let back = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    today.checked_sub_days(Days::new(back)).unwrap_or(today)
}

/// True when `latest` reaches the last business day before `today`.
#[must_use]
pub fn is_actual(today: NaiveDate, latest: Option<NaiveDate>) -> bool {
    latest.is_some_and(|d| d >= last_business_day(today))
}

/// Actuality summary for an exporter's downloaded intervals.
#[must_use]
pub fn evaluate_actuality(today: NaiveDate, intervals: &[DownloadedInterval]) -> Actuality {
    let last_downloaded = intervals.iter().map(|i| i.date_to).max();
    Actuality {
        last_business_day: last_business_day(today),
        last_downloaded,
        is_actual: is_actual(today, last_downloaded),
        has_gaps: intervals.len() > 1,
    }
}
