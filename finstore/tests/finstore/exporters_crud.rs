use finstore::{ExporterId, ExporterType, FinStoreError};

use crate::helpers::*;

#[tokio::test]
async fn create_lookup_and_uniqueness() {
    let (fs, _) = fin_store();
    let id = fs
        .create_exporter(mock_exporter("MSCI", "MSCI_WORLD"))
        .await
        .expect("created");

    let by_code = fs.exporter_by_code("MSCI").await.expect("by code");
    let by_id = fs.exporter_by_id(id).await.expect("by id");
    assert_eq!(by_code, by_id);
    assert_eq!(by_id.download_history_parameters["code"], "MSCI_WORLD");

    assert!(!fs.is_exporter_code_unique("MSCI", None).await.unwrap());
    assert!(fs.is_exporter_code_unique("MSCI", Some(id)).await.unwrap());
    assert!(fs.is_exporter_code_unique("OTHER", None).await.unwrap());

    let err = fs
        .create_exporter(mock_exporter("MSCI", "USD_RUB"))
        .await
        .unwrap_err();
    assert_eq!(err, FinStoreError::DuplicateCode { code: "MSCI".into() });
}

#[tokio::test]
async fn create_rejects_unregistered_type_and_blank_code() {
    let (fs, _) = fin_store();
    let err = fs
        .create_exporter(new_exporter("X", "nowhere", "X"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::InvalidArg(_)));

    let err = fs
        .create_exporter(mock_exporter("  ", "MSCI_WORLD"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::InvalidArg(_)));
}

#[tokio::test]
async fn unknown_exporters_are_not_found() {
    let (fs, _) = fin_store();
    assert!(matches!(
        fs.exporter_by_code("NOPE").await,
        Err(FinStoreError::NotFound { .. })
    ));
    assert!(matches!(
        fs.exporter_by_id(ExporterId(42)).await,
        Err(FinStoreError::NotFound { .. })
    ));
    assert!(matches!(
        fs.delete_exporter(ExporterId(42)).await,
        Err(FinStoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_checks_code_collisions_and_type() {
    let (fs, _) = fin_store();
    let a = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    fs.create_exporter(mock_exporter("B", "USD_RUB")).await.unwrap();

    let mut rec = fs.exporter_by_id(a).await.unwrap();
    rec.unique_code = "B".into();
    assert!(matches!(
        fs.update_exporter(rec.clone()).await,
        Err(FinStoreError::DuplicateCode { .. })
    ));

    rec.unique_code = "A2".into();
    rec.exporter_type = ExporterType::from("nowhere");
    assert!(matches!(
        fs.update_exporter(rec.clone()).await,
        Err(FinStoreError::InvalidArg(_))
    ));

    rec.exporter_type = ExporterType::from(finstore_mock::MOCK_EXPORTER_TYPE);
    rec.is_active = false;
    fs.update_exporter(rec).await.expect("updated");
    let stored = fs.exporter_by_code("A2").await.unwrap();
    assert_eq!(stored.id, a);
    assert!(!stored.is_active);
}

#[tokio::test]
async fn update_or_create_matches_by_code() {
    let (fs, _) = fin_store();
    assert!(fs
        .update_or_create_exporter(mock_exporter("A", "MSCI_WORLD"))
        .await
        .unwrap());

    let mut changed = mock_exporter("A", "USD_RUB");
    changed.description = "rates".into();
    assert!(!fs.update_or_create_exporter(changed).await.unwrap());

    let rec = fs.exporter_by_code("A").await.unwrap();
    assert_eq!(rec.description, "rates");
    assert_eq!(rec.download_history_parameters["code"], "USD_RUB");
}

#[tokio::test]
async fn delete_cascades_history() {
    let (fs, store) = fin_store();
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    fs.download_history("A", d("2024-01-02"), d("2024-01-05"))
        .await
        .expect("downloaded");
    assert_eq!(store.point_count(id).await, 4);

    fs.delete_exporter(id).await.expect("deleted");
    assert_eq!(store.point_count(id).await, 0);
    assert!(matches!(
        fs.exporter_by_code("A").await,
        Err(FinStoreError::NotFound { .. })
    ));
    // The code is free again.
    fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
}
