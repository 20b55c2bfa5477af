//! Downloaded date ranges and their storage envelopes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range for which history was fetched and verified.
///
/// Not every date inside the range necessarily has a stored point (weekends,
/// holidays); the range only records that the source was asked about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DownloadedInterval {
    /// First covered date.
    pub date_from: NaiveDate,
    /// Last covered date.
    pub date_to: NaiveDate,
}

impl DownloadedInterval {
    /// Construct an interval.
    #[must_use]
    pub const fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self { date_from, date_to }
    }

    /// True if `date` lies inside the range (both ends inclusive).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_from <= date && date <= self.date_to
    }

    /// True if the two ranges overlap or leave no uncovered day between them.
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        let (first, second) = if self.date_from <= other.date_from {
            (self, other)
        } else {
            (other, self)
        };
        first
            .date_to
            .succ_opt()
            .is_none_or(|next| next >= second.date_from)
    }
}

/// Storage-assigned identity of a downloaded interval.
///
/// Stores hand these out in strictly increasing creation order; the lowest
/// identity is the survivor when intervals are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntervalId(pub u64);

/// A downloaded interval as persisted by a record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInterval {
    /// Storage identity.
    pub id: IntervalId,
    /// Covered range.
    pub interval: DownloadedInterval,
}

impl StoredInterval {
    /// Construct a stored interval.
    #[must_use]
    pub const fn new(id: IntervalId, interval: DownloadedInterval) -> Self {
        Self { id, interval }
    }
}

/// Write instruction for a downloaded interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalWrite {
    /// Insert a new interval; the store assigns its identity.
    Create(DownloadedInterval),
    /// Overwrite the bounds of an existing interval.
    Update {
        /// Identity of the interval to rewrite.
        id: IntervalId,
        /// New bounds.
        interval: DownloadedInterval,
    },
}

impl IntervalWrite {
    /// Bounds carried by the write.
    #[must_use]
    pub const fn interval(&self) -> DownloadedInterval {
        match *self {
            Self::Create(interval) | Self::Update { interval, .. } => interval,
        }
    }
}

/// Optional inclusive date filter used when reading points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date (inclusive).
    pub from: NaiveDate,
    /// Last date (inclusive).
    pub to: NaiveDate,
}

impl DateRange {
    /// Construct a range.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// True if `date` lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
