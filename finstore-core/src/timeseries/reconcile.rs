use chrono::NaiveDate;
use finstore_types::{
    DownloadedInterval, IntervalId, IntervalOutcome, IntervalWrite, StoredInterval,
    TimeSeriesPoint,
};

/// Writes needed to persist one downloaded slice of history.
///
/// Produced by [`reconcile`]; a record store executes it (see
/// `RecordStore::apply_reconciliation`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Claimed range after widening to cover every point.
    pub date_from: NaiveDate,
    /// Claimed range after widening to cover every point.
    pub date_to: NaiveDate,
    /// Intervals absorbed by the survivor of a merge, ascending by id.
    pub to_delete: Vec<IntervalId>,
    /// Interval creations or survivor rewrites.
    pub to_upsert: Vec<IntervalWrite>,
    /// Points to insert or overwrite by moment.
    pub points: Vec<TimeSeriesPoint>,
    /// Summary of the interval change.
    pub outcome: IntervalOutcome,
}

impl ReconcilePlan {
    /// True when executing the plan would not touch the store.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty() && self.to_upsert.is_empty() && self.points.is_empty()
    }

    /// Interval set that results from applying the plan to `existing`,
    /// ascending by `date_from`.
    #[must_use]
    pub fn updated_intervals(&self, existing: &[StoredInterval]) -> Vec<DownloadedInterval> {
        let mut out: Vec<DownloadedInterval> = existing
            .iter()
            .filter(|s| !self.to_delete.contains(&s.id))
            .map(|s| {
                self.to_upsert
                    .iter()
                    .find_map(|w| match *w {
                        IntervalWrite::Update { id, interval } if id == s.id => Some(interval),
                        _ => None,
                    })
                    .unwrap_or(s.interval)
            })
            .collect();
        out.extend(self.to_upsert.iter().filter_map(|w| match *w {
            IntervalWrite::Create(interval) => Some(interval),
            IntervalWrite::Update { .. } => None,
        }));
        out.sort();
        out
    }
}

/// Merge a freshly downloaded slice into an exporter's downloaded intervals.
///
/// - The claimed range `[claimed_from, claimed_to]` is first widened to cover
///   every point in `new_points`.
/// - Intervals overlapping or adjacent (one-day buffer) to the widened range are
///   *affected*. With none affected, a new interval spanning exactly the point
///   dates is created; an empty download over virgin territory records nothing.
/// - Otherwise the edges `claimed_from - 1` and `claimed_to + 1` are checked for
///   *piercing* into existing coverage. An empty download is only recorded when
///   both edges are pierced, which is how two intervals get joined across an
///   empty probe.
/// - The merged bounds span the claimed range and all affected intervals; an
///   edge that is neither pierced nor backed by a point on the claimed boundary
///   is tightened to the nearest point date.
/// - The affected interval with the lowest id survives and takes the merged
///   bounds; the other affected intervals are deleted.
/// - Every point is upserted regardless of the interval outcome.
///
/// # Panics
/// Panics when `new_points` is empty and `claimed_from > claimed_to`: such a
/// call is a caller bug, not a recoverable condition.
#[must_use]
pub fn reconcile(
    existing: &[StoredInterval],
    new_points: Vec<TimeSeriesPoint>,
    claimed_from: NaiveDate,
    claimed_to: NaiveDate,
) -> ReconcilePlan {
    let point_bounds = new_points
        .iter()
        .map(TimeSeriesPoint::date)
        .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| {
            Some(acc.map_or((d, d), |(lo, hi)| (lo.min(d), hi.max(d))))
        });
    assert_eq!(
        new_points.is_empty(),
        point_bounds.is_none(),
        "point date bounds must exist exactly when points exist"
    );

    let (mut date_from, mut date_to) = (claimed_from, claimed_to);
    if let Some((min_point, max_point)) = point_bounds {
        date_from = date_from.min(min_point);
        date_to = date_to.max(max_point);
    }
    assert!(
        date_from <= date_to,
        "claimed range {date_from}..{date_to} is inverted and no points widen it"
    );

    let edge_before = date_from.pred_opt().unwrap_or(date_from);
    let edge_after = date_to.succ_opt().unwrap_or(date_to);

    let affected: Vec<&StoredInterval> = existing
        .iter()
        .filter(|s| s.interval.date_to >= edge_before && s.interval.date_from <= edge_after)
        .collect();

    let mut plan = ReconcilePlan {
        date_from,
        date_to,
        to_delete: Vec::new(),
        to_upsert: Vec::new(),
        points: Vec::new(),
        outcome: IntervalOutcome::Unchanged,
    };

    if affected.is_empty() {
        if let Some((min_point, max_point)) = point_bounds {
            plan.to_upsert.push(IntervalWrite::Create(DownloadedInterval::new(
                min_point, max_point,
            )));
            plan.outcome = IntervalOutcome::Created;
        }
        plan.points = new_points;
        return plan;
    }

    let pierce_left = existing.iter().any(|s| s.interval.contains(edge_before));
    let pierce_right = existing.iter().any(|s| s.interval.contains(edge_after));

    if point_bounds.is_none() && !(pierce_left && pierce_right) {
        return plan;
    }

    let mut merged_from = affected
        .iter()
        .map(|s| s.interval.date_from)
        .fold(date_from, NaiveDate::min);
    let mut merged_to = affected
        .iter()
        .map(|s| s.interval.date_to)
        .fold(date_to, NaiveDate::max);

    if let Some((min_point, max_point)) = point_bounds {
        if !pierce_left && min_point > date_from {
            merged_from = min_point;
        }
        if !pierce_right && max_point < date_to {
            merged_to = max_point;
        }
    }

    let mut ids: Vec<IntervalId> = affected.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    let survivor = ids.remove(0);

    plan.outcome = IntervalOutcome::Merged {
        absorbed: ids.len(),
    };
    plan.to_delete = ids;
    plan.to_upsert.push(IntervalWrite::Update {
        id: survivor,
        interval: DownloadedInterval::new(merged_from, merged_to),
    });
    plan.points = new_points;
    plan
}
