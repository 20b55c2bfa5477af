use finstore::{ComposeType, FinStore, FinStoreError, HistoryQuery};

use crate::helpers::*;

async fn seeded() -> FinStore {
    let (fs, _) = fin_store();
    let a = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let b = fs.create_exporter(mock_exporter("B", "USD_RUB")).await.unwrap();
    fs.save_history_data(
        a,
        vec![pt("2024-01-01", 10), pt("2024-01-03", 12)],
        d("2024-01-01"),
        d("2024-01-03"),
    )
    .await
    .unwrap();
    fs.save_history_data(
        b,
        vec![pt("2024-01-02", 2), pt("2024-01-03", 0)],
        d("2024-01-02"),
        d("2024-01-03"),
    )
    .await
    .unwrap();
    fs
}

#[tokio::test]
async fn divide_carries_values_and_zeroes_failures() {
    let fs = seeded().await;
    let view = fs
        .compose(
            "A",
            "divide".parse::<ComposeType>().unwrap(),
            "B",
            d("2024-01-02"),
            d("2024-01-03"),
            HistoryQuery::new(),
        )
        .await
        .unwrap();
    assert_eq!(view.exporter1_code, "A");
    assert_eq!(view.exporter2_code, "B");
    assert_eq!(view.compose_type, "divide");
    assert_eq!(dates(&view.data), vec!["2024-01-02", "2024-01-03"]);
    assert_eq!(values(&view.data), vec!["5", "0"]);
}

#[tokio::test]
async fn fill_gaps_aligns_both_sides_daily() {
    let fs = seeded().await;
    let view = fs
        .compose(
            "A",
            ComposeType::Add,
            "B",
            d("2024-01-02"),
            d("2024-01-04"),
            HistoryQuery::new().fill_gaps(true),
        )
        .await
        .unwrap();
    assert_eq!(
        dates(&view.data),
        vec!["2024-01-02", "2024-01-03", "2024-01-04"]
    );
    assert_eq!(values(&view.data), vec!["12", "12", "12"]);
}

#[tokio::test]
async fn compose_requires_both_exporters() {
    let fs = seeded().await;
    let err = fs
        .compose(
            "A",
            ComposeType::Multiply,
            "NOPE",
            d("2024-01-02"),
            d("2024-01-03"),
            HistoryQuery::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FinStoreError::NotFound { .. }));
}

#[tokio::test]
async fn inverted_compose_window_is_empty() {
    let fs = seeded().await;
    let view = fs
        .compose(
            "A",
            ComposeType::Subtract,
            "B",
            d("2024-01-03"),
            d("2024-01-02"),
            HistoryQuery::new(),
        )
        .await
        .unwrap();
    assert!(view.data.is_empty());
}
