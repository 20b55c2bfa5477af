use finstore::{DateRange, ExporterId, FinStoreError, IntervalOutcome, RecordStore};

use crate::helpers::*;

#[tokio::test]
async fn empty_probe_over_virgin_range_records_nothing() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let report = fs
        .save_history_data(id, Vec::new(), d("2024-01-10"), d("2024-01-12"))
        .await
        .unwrap();
    assert_eq!(report.outcome, IntervalOutcome::Unchanged);
    assert!(report.intervals.is_empty());
    assert!(store.get_intervals(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_probe_between_intervals_merges_them() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    fs.save_history_data(
        id,
        vec![pt("2024-01-01", 1), pt("2024-01-05", 5)],
        d("2024-01-01"),
        d("2024-01-05"),
    )
    .await
    .unwrap();
    fs.save_history_data(
        id,
        vec![pt("2024-01-08", 8), pt("2024-01-12", 12)],
        d("2024-01-08"),
        d("2024-01-12"),
    )
    .await
    .unwrap();

    let report = fs
        .save_history_data(id, Vec::new(), d("2024-01-06"), d("2024-01-07"))
        .await
        .unwrap();
    assert_eq!(report.outcome, IntervalOutcome::Merged { absorbed: 1 });
    assert_eq!(report.intervals, vec![iv("2024-01-01", "2024-01-12")]);

    let stored = store.get_intervals(id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].interval, iv("2024-01-01", "2024-01-12"));
}

#[tokio::test]
async fn unproven_edges_are_tightened_to_points() {
    let (fs, _) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let report = fs
        .save_history_data(id, vec![pt("2024-01-03", 3)], d("2024-01-01"), d("2024-01-05"))
        .await
        .unwrap();
    assert_eq!(report.outcome, IntervalOutcome::Created);
    assert_eq!(report.points_saved, 1);
    assert_eq!(report.intervals, vec![iv("2024-01-03", "2024-01-03")]);
}

#[tokio::test]
async fn points_outside_the_claim_widen_it() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let report = fs
        .save_history_data(
            id,
            vec![pt("2024-01-01", 1), pt("2024-01-07", 7)],
            d("2024-01-03"),
            d("2024-01-05"),
        )
        .await
        .unwrap();
    assert_eq!((report.date_from, report.date_to), (d("2024-01-01"), d("2024-01-07")));
    assert_eq!(report.intervals, vec![iv("2024-01-01", "2024-01-07")]);

    let points = store
        .get_points(id, Some(DateRange::new(d("2024-01-01"), d("2024-01-31"))))
        .await
        .unwrap();
    assert_eq!(dates(&points), vec!["2024-01-01", "2024-01-07"]);
}

#[tokio::test]
async fn repeating_a_save_is_idempotent() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let points = vec![pt("2024-01-02", 2), pt("2024-01-04", 4)];
    let first = fs
        .save_history_data(id, points.clone(), d("2024-01-01"), d("2024-01-05"))
        .await
        .unwrap();
    let second = fs
        .save_history_data(id, points, d("2024-01-01"), d("2024-01-05"))
        .await
        .unwrap();
    assert_eq!(first.intervals, second.intervals);
    assert_eq!(store.get_intervals(id).await.unwrap().len(), 1);
    assert_eq!(store.point_count(id).await, 2);
}

#[tokio::test]
async fn invalid_saves_are_rejected_before_touching_the_store() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let err = fs
        .save_history_data(id, Vec::new(), d("2024-01-05"), d("2024-01-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::InvalidArg(_)));
    assert!(store.get_intervals(id).await.unwrap().is_empty());

    let err = fs
        .save_history_data(ExporterId(99), vec![pt("2024-01-02", 1)], d("2024-01-02"), d("2024-01-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::NotFound { .. }));
}

#[tokio::test]
async fn inverted_claim_with_points_is_accepted() {
    let (fs, _) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let report = fs
        .save_history_data(id, vec![pt("2024-01-03", 3)], d("2024-01-05"), d("2024-01-01"))
        .await
        .unwrap();
    assert_eq!(report.intervals, vec![iv("2024-01-03", "2024-01-03")]);
}
