use std::sync::Arc;

use finstore::{DateRange, FinStoreError, IntervalOutcome, RecordStore};
use finstore_mock::{MemoryStore, MockBehavior};

use crate::helpers::*;

#[tokio::test]
async fn download_saves_points_and_intervals() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("MSCI", "MSCI_WORLD")).await.unwrap();

    // Saturday and Sunday have no values but lie inside the verified range.
    let report = fs
        .download_history("MSCI", d("2024-01-04"), d("2024-01-09"))
        .await
        .unwrap();
    assert_eq!(report.points_saved, 4);
    assert_eq!(report.outcome, IntervalOutcome::Created);
    assert_eq!(report.intervals, vec![iv("2024-01-04", "2024-01-09")]);

    let points = store.get_points(id, None).await.unwrap();
    assert_eq!(
        dates(&points),
        vec!["2024-01-04", "2024-01-05", "2024-01-08", "2024-01-09"]
    );
}

#[tokio::test]
async fn download_uses_local_midnights_of_the_configured_timezone() {
    let store = Arc::new(MemoryStore::new());
    let (dynamic, controller) = finstore_mock::DynamicMockExporter::new_with_controller(DYN);
    let fs = builder(&store)
        .with_factory(dynamic)
        .timezone(chrono_tz::Europe::Moscow)
        .build()
        .unwrap();
    fs.create_exporter(new_exporter("RATES", DYN, "USD_RUB")).await.unwrap();
    controller
        .set_history_behavior(
            "USD_RUB",
            MockBehavior::Return(vec![pt_at("2024-01-10T00:00:00+03:00", 89)]),
        )
        .await;

    fs.download_history("RATES", d("2024-01-10"), d("2024-01-11"))
        .await
        .unwrap();
    let log = controller.history_requests().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].moment_from.to_rfc3339(), "2024-01-10T00:00:00+03:00");
    assert_eq!(log[0].moment_to.to_rfc3339(), "2024-01-11T00:00:00+03:00");
}

#[tokio::test]
async fn download_starts_a_day_with_skipped_midnight_after_the_gap() {
    let store = Arc::new(MemoryStore::new());
    let (dynamic, controller) = finstore_mock::DynamicMockExporter::new_with_controller(DYN);
    let fs = builder(&store)
        .with_factory(dynamic)
        .timezone(chrono_tz::America::Santiago)
        .build()
        .unwrap();
    fs.create_exporter(new_exporter("CLP", DYN, "USD_CLP")).await.unwrap();
    controller
        .set_history_behavior(
            "USD_CLP",
            MockBehavior::Return(vec![pt_at("2024-09-08T12:00:00-03:00", 940)]),
        )
        .await;

    fs.download_history("CLP", d("2024-09-08"), d("2024-09-09"))
        .await
        .unwrap();
    let log = controller.history_requests().await;
    assert_eq!(log[0].moment_from.to_rfc3339(), "2024-09-08T01:00:00-03:00");
    assert_eq!(log[0].moment_to.to_rfc3339(), "2024-09-09T00:00:00-03:00");
}

#[tokio::test]
async fn persisted_downloads_leave_the_cache() {
    let (fs, _, controller) = fin_store_with_dynamic();
    fs.create_exporter(new_exporter("A", DYN, "X")).await.unwrap();
    controller
        .set_history_behavior("X", MockBehavior::Return(vec![pt("2024-01-02", 1)]))
        .await;

    for _ in 0..2 {
        fs.download_history("A", d("2024-01-01"), d("2024-01-03"))
            .await
            .unwrap();
    }
    assert_eq!(controller.history_requests().await.len(), 2);
}

#[tokio::test]
async fn failed_downloads_save_nothing() {
    let (fs, store, controller) = fin_store_with_dynamic();
    let id = fs.create_exporter(new_exporter("A", DYN, "X")).await.unwrap();
    controller
        .set_history_behavior("X", MockBehavior::Fail(FinStoreError::exporter(DYN, "HTTP 502")))
        .await;

    let err = fs
        .download_history("A", d("2024-01-01"), d("2024-01-03"))
        .await
        .unwrap_err();
    assert_eq!(err, FinStoreError::exporter(DYN, "HTTP 502"));
    assert!(store.get_intervals(id).await.unwrap().is_empty());
    assert!(
        store
            .get_points(id, Some(DateRange::new(d("2024-01-01"), d("2024-01-03"))))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn inactive_and_unregistered_exporters_are_refused() {
    let (fs, store) = fin_store();
    let mut inactive = mock_exporter("IDLE", "MSCI_WORLD");
    inactive.is_active = false;
    fs.create_exporter(inactive).await.unwrap();
    store
        .insert_exporter(new_exporter("GONE", "gone", "X"))
        .await
        .unwrap();

    for code in ["IDLE", "GONE"] {
        let err = fs
            .download_history(code, d("2024-01-02"), d("2024-01-03"))
            .await
            .unwrap_err();
        assert_eq!(err, FinStoreError::ExporterDisabled { code: code.into() });
    }
}

#[tokio::test]
async fn inverted_ranges_and_unknown_codes_fail_fast() {
    let (fs, _) = fin_store();
    fs.create_exporter(mock_exporter("MSCI", "MSCI_WORLD")).await.unwrap();
    assert!(matches!(
        fs.download_history("MSCI", d("2024-01-09"), d("2024-01-04")).await,
        Err(FinStoreError::InvalidArg(_))
    ));
    assert!(matches!(
        fs.download_history("NOPE", d("2024-01-04"), d("2024-01-09")).await,
        Err(FinStoreError::NotFound { .. })
    ));
}
