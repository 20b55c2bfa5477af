use finstore::{ExporterType, FinStoreError, InstrumentInfo};
use finstore_mock::MockBehavior;

use crate::helpers::*;

#[tokio::test]
async fn instruments_are_listed_and_cached() {
    let (fs, _, controller) = fin_store_with_dynamic();
    let listed = vec![InstrumentInfo {
        code: "MSCI".into(),
        name: "MSCI World".into(),
    }];
    controller
        .set_instruments_behavior(MockBehavior::Return(listed.clone()))
        .await;

    let params = serde_json::json!({ "region": "world" });
    let got = fs
        .available_instruments(&ExporterType::from(DYN), &params)
        .await
        .unwrap();
    assert_eq!(*got, listed);

    // A failing source no longer matters once the list is cached.
    controller
        .set_instruments_behavior(MockBehavior::Fail(FinStoreError::exporter(DYN, "down")))
        .await;
    let cached = fs
        .available_instruments(&ExporterType::from(DYN), &params)
        .await
        .unwrap();
    assert_eq!(*cached, listed);

    // Other parameters miss the cache.
    let err = fs
        .available_instruments(&ExporterType::from(DYN), &serde_json::Value::Null)
        .await
        .unwrap_err();
    assert_eq!(err, FinStoreError::exporter(DYN, "down"));
}

#[tokio::test]
async fn instruments_of_unknown_type_are_not_found() {
    let (fs, _) = fin_store();
    let err = fs
        .available_instruments(&ExporterType::from("nowhere"), &serde_json::Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::NotFound { .. }));

    let fixture = fs
        .available_instruments(
            &ExporterType::from(finstore_mock::MOCK_EXPORTER_TYPE),
            &serde_json::Value::Null,
        )
        .await
        .unwrap();
    assert_eq!(fixture.len(), 3);
}
