mod common;

use chrono::NaiveDate;
use finstore::HistoryQuery;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();
    let fs = common::fin_store()?;
    fs.create_exporter(common::exporter("MSCI_World", "MSCI_WORLD"))
        .await?;

    let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d");

    // 1. Two disjoint downloads leave a gap.
    fs.download_history("MSCI_World", date("2024-01-02")?, date("2024-01-04")?)
        .await?;
    let report = fs
        .download_history("MSCI_World", date("2024-01-09")?, date("2024-01-11")?)
        .await?;
    println!("after two downloads: {:?}", report.intervals);

    // 2. Downloading the gap joins both intervals.
    let report = fs
        .download_history("MSCI_World", date("2024-01-05")?, date("2024-01-08")?)
        .await?;
    println!("after filling the gap: {:?} ({:?})", report.intervals, report.outcome);

    // 3. Actualize up to a given day.
    let actualized = fs.actualize_history("MSCI_World", date("2024-01-13")?).await?;
    println!("actualize: {:?}", actualized.outcome);

    // 4. Read back one value per day, weekends forward-filled.
    let view = fs
        .history(
            "MSCI_World",
            date("2024-01-04")?,
            date("2024-01-09")?,
            HistoryQuery::new().fill_gaps(true),
        )
        .await?;
    for p in &view.data {
        println!("{}  {}", p.moment, p.value);
    }

    let today = date("2024-01-15")?;
    for summary in fs.list_exporters(today).await? {
        println!(
            "{}: actual={} gaps={}",
            summary.record.unique_code, summary.actuality.is_actual, summary.actuality.has_gaps
        );
    }
    Ok(())
}
