use std::sync::Arc;

use chrono::Days;
use finstore::RecordStore;

use crate::helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_of_one_exporter_keep_intervals_disjoint() {
    let (fs, store) = fin_store();
    let fs = Arc::new(fs);
    let id = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();

    // Shuffled so that neighbours are often saved by racing tasks.
    let order = [7u64, 2, 15, 0, 11, 4, 19, 9, 13, 1, 17, 6, 3, 18, 10, 5, 14, 8, 16, 12];
    let start = d("2024-03-01");
    let tasks: Vec<_> = order
        .iter()
        .map(|&offset| {
            let fs = Arc::clone(&fs);
            tokio::spawn(async move {
                let day = start.checked_add_days(Days::new(offset)).unwrap();
                let point = pt(&day.to_string(), i64::try_from(offset).unwrap());
                fs.save_history_data(id, vec![point], day, day).await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task").expect("saved");
    }

    let intervals = store.get_intervals(id).await.unwrap();
    assert_eq!(intervals.len(), 1, "got {intervals:?}");
    assert_eq!(intervals[0].interval, iv("2024-03-01", "2024-03-20"));
    assert_eq!(store.point_count(id).await, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_exporters_save_independently() {
    let (fs, store) = fin_store();
    let fs = Arc::new(fs);
    let a = fs.create_exporter(mock_exporter("A", "MSCI_WORLD")).await.unwrap();
    let b = fs.create_exporter(mock_exporter("B", "USD_RUB")).await.unwrap();

    let (ra, rb) = tokio::join!(
        fs.save_history_data(a, vec![pt("2024-01-02", 1)], d("2024-01-01"), d("2024-01-02")),
        fs.save_history_data(b, vec![pt("2024-02-02", 2)], d("2024-02-01"), d("2024-02-02")),
    );
    assert_eq!(ra.unwrap().intervals, vec![iv("2024-01-02", "2024-01-02")]);
    assert_eq!(rb.unwrap().intervals, vec![iv("2024-02-02", "2024-02-02")]);
    assert_eq!(store.get_intervals(a).await.unwrap().len(), 1);
    assert_eq!(store.get_intervals(b).await.unwrap().len(), 1);
}
