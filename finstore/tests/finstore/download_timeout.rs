use std::sync::Arc;
use std::time::Duration;

use finstore::{ExporterType, FinStoreError, RecordStore};
use finstore_mock::{DynamicMockExporter, MemoryStore, MockBehavior};

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn hanging_history_download_times_out() {
    let store = Arc::new(MemoryStore::new());
    let (dynamic, controller) = DynamicMockExporter::new_with_controller(DYN);
    let fs = builder(&store)
        .with_factory(dynamic)
        .download_timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let id = fs.create_exporter(new_exporter("A", DYN, "X")).await.unwrap();
    controller.set_history_behavior("X", MockBehavior::Hang).await;

    let err = fs
        .download_history("A", d("2024-01-01"), d("2024-01-02"))
        .await
        .unwrap_err();
    assert_eq!(err, FinStoreError::download_timeout(DYN, "history"));
    assert!(err.is_actionable());
    assert!(store.get_intervals(id).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_fixture_source_times_out() {
    let store = Arc::new(MemoryStore::new());
    let fs = builder(&store)
        .download_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    fs.create_exporter(mock_exporter("SLOW", "TIMEOUT")).await.unwrap();

    let err = fs
        .download_history("SLOW", d("2024-01-01"), d("2024-01-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::DownloadTimeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn hanging_instruments_listing_times_out() {
    let (fs, _, controller) = fin_store_with_dynamic();
    controller.set_instruments_behavior(MockBehavior::Hang).await;
    let err = fs
        .available_instruments(&ExporterType::from(DYN), &serde_json::Value::Null)
        .await
        .unwrap_err();
    assert_eq!(err, FinStoreError::download_timeout(DYN, "instruments"));
}
