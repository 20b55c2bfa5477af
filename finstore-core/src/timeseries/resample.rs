use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use finstore_types::TimeSeriesPoint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// How values inside a requested window are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalValuesType {
    /// One value per calendar day, forward-filling days without a point.
    EveryDayValues,
    /// Only points inside the window.
    #[default]
    OnlyInteriorValues,
    /// Points inside the window plus the latest point at or before its start.
    AllowPrecedingValue,
}

/// Window and selection policy shared by history and composition queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleWindow {
    /// Inclusive start; its timezone is the one used to bucket days.
    pub moment_from: DateTime<Tz>,
    /// Inclusive end.
    pub moment_to: DateTime<Tz>,
    /// Value selection policy.
    pub values_type: IntervalValuesType,
    /// Keep time-of-day resolution instead of collapsing to dates.
    pub intraday: bool,
}

impl ResampleWindow {
    /// Construct a window.
    #[must_use]
    pub const fn new(
        moment_from: DateTime<Tz>,
        moment_to: DateTime<Tz>,
        values_type: IntervalValuesType,
        intraday: bool,
    ) -> Self {
        Self {
            moment_from,
            moment_to,
            values_type,
            intraday,
        }
    }

    /// Window spanning local midnight of `date_from` to local midnight of `date_to` in `tz`.
    ///
    /// Returns `None` when either date cannot be placed on the timeline.
    #[must_use]
    pub fn for_dates(
        tz: Tz,
        date_from: NaiveDate,
        date_to: NaiveDate,
        values_type: IntervalValuesType,
        intraday: bool,
    ) -> Option<Self> {
        let moment_from = local_day_start(tz, date_from)?.with_timezone(&tz);
        let moment_to = local_day_start(tz, date_to)?.with_timezone(&tz);
        Some(Self::new(moment_from, moment_to, values_type, intraday))
    }

    fn timezone(&self) -> Tz {
        self.moment_from.timezone()
    }
}

/// Start of `date` in `tz` as a UTC instant.
///
/// Ambiguous midnights resolve to the earlier instant. When a DST jump skips
/// midnight, the day starts at the first local time that exists on that date.
#[must_use]
pub fn local_day_start(tz: Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    (0..MINUTES_PER_DAY).find_map(|minute| {
        let naive = midnight.checked_add_signed(TimeDelta::minutes(minute))?;
        if naive.date() != date {
            return None;
        }
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                Some(dt.with_timezone(&Utc))
            }
            LocalResult::None => None,
        }
    })
}

fn bucket_key(tz: Tz, moment: DateTime<Utc>, intraday: bool) -> Option<DateTime<Utc>> {
    if intraday {
        Some(moment)
    } else {
        local_day_start(tz, moment.with_timezone(&tz).date_naive())
    }
}

/// Sort `points` and select values for `window`.
///
/// Points are ordered by moment; with `intraday = false` each one is keyed by
/// the local midnight of its date, and a later point overwrites an earlier one
/// on the same day. An inverted window yields nothing.
///
/// `EveryDayValues` always emits day-granular moments: each day carries the
/// latest value at or before its end (the window end on the last day). Days
/// before the first known value are omitted.
#[must_use]
pub fn build_sorted_history_data<I>(points: I, window: &ResampleWindow) -> HistoryValues
where
    I: IntoIterator<Item = TimeSeriesPoint>,
{
    let tz = window.timezone();
    if window.moment_from > window.moment_to {
        return HistoryValues::empty(tz);
    }

    let mut sorted: Vec<TimeSeriesPoint> = points.into_iter().collect();
    sorted.sort_by_key(|p| p.moment);

    let mut values: BTreeMap<DateTime<Utc>, Decimal> = BTreeMap::new();
    for p in sorted {
        if let Some(key) = bucket_key(tz, p.moment.with_timezone(&Utc), window.intraday) {
            values.insert(key, p.value);
        }
    }
    if values.is_empty() {
        return HistoryValues::empty(tz);
    }

    let from = window.moment_from.with_timezone(&Utc);
    let to = window.moment_to.with_timezone(&Utc);

    match window.values_type {
        IntervalValuesType::EveryDayValues => {
            let first_day = window.moment_from.date_naive();
            let last_day = window.moment_to.date_naive();
            HistoryValues {
                tz,
                inner: Inner::EveryDay(EveryDay {
                    values,
                    next_day: Some(first_day),
                    last_day,
                    window_to: to,
                }),
            }
        }
        IntervalValuesType::OnlyInteriorValues | IntervalValuesType::AllowPrecedingValue => {
            let (Some(from_key), Some(to_key)) = (
                bucket_key(tz, from, window.intraday),
                bucket_key(tz, to, window.intraday),
            ) else {
                return HistoryValues::empty(tz);
            };
            let start = if window.values_type == IntervalValuesType::AllowPrecedingValue {
                values
                    .range(..=from_key)
                    .next_back()
                    .map_or(from_key, |(k, _)| *k)
            } else {
                from_key
            };
            let selected: Vec<(DateTime<Utc>, Decimal)> = values
                .range(start..=to_key)
                .map(|(k, v)| (*k, *v))
                .collect();
            HistoryValues {
                tz,
                inner: Inner::Keyed(selected.into_iter()),
            }
        }
    }
}

/// Lazy, ascending sequence of selected history values.
#[derive(Debug)]
pub struct HistoryValues {
    tz: Tz,
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Empty,
    Keyed(std::vec::IntoIter<(DateTime<Utc>, Decimal)>),
    EveryDay(EveryDay),
}

#[derive(Debug)]
struct EveryDay {
    values: BTreeMap<DateTime<Utc>, Decimal>,
    next_day: Option<NaiveDate>,
    last_day: NaiveDate,
    window_to: DateTime<Utc>,
}

impl EveryDay {
    fn next_value(&mut self, tz: Tz) -> Option<(DateTime<Utc>, Decimal)> {
        loop {
            let day = self.next_day.filter(|d| *d <= self.last_day)?;
            self.next_day = day.succ_opt();
            let Some(day_start) = local_day_start(tz, day) else {
                continue;
            };
            let cutoff = if day == self.last_day {
                Bound::Included(self.window_to)
            } else {
                match day.succ_opt().and_then(|next| local_day_start(tz, next)) {
                    Some(next_start) => Bound::Excluded(next_start),
                    None => Bound::Unbounded,
                }
            };
            if let Some((_, value)) = self.values.range((Bound::Unbounded, cutoff)).next_back() {
                return Some((day_start, *value));
            }
        }
    }
}

impl HistoryValues {
    const fn empty(tz: Tz) -> Self {
        Self {
            tz,
            inner: Inner::Empty,
        }
    }
}

impl Iterator for HistoryValues {
    type Item = TimeSeriesPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = match &mut self.inner {
            Inner::Empty => None,
            Inner::Keyed(it) => it.next(),
            Inner::EveryDay(days) => days.next_value(self.tz),
        }?;
        Some(TimeSeriesPoint::new(
            key.with_timezone(&self.tz).fixed_offset(),
            value,
        ))
    }
}
