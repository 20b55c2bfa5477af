mod common;

use chrono::NaiveDate;
use finstore::{ComposeType, HistoryQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();
    let fs = common::fin_store()?;
    fs.create_exporter(common::exporter("MSCI_World", "MSCI_WORLD"))
        .await?;
    fs.create_exporter(common::exporter("USD_RUB", "USD_RUB"))
        .await?;
    fs.create_exporter(common::exporter("Zero", "ZERO")).await?;

    let from = NaiveDate::parse_from_str("2024-01-08", "%Y-%m-%d")?;
    let to = NaiveDate::parse_from_str("2024-01-14", "%Y-%m-%d")?;
    for code in ["MSCI_World", "USD_RUB", "Zero"] {
        fs.download_history(code, from, to).await?;
    }

    // MSCI World priced in roubles; the weekend carries the Friday close.
    let compose_type: ComposeType = "multiply".parse()?;
    let view = fs
        .compose(
            "MSCI_World",
            compose_type,
            "USD_RUB",
            from,
            to,
            HistoryQuery::new().fill_gaps(true),
        )
        .await?;
    println!("{} {} {}:", view.exporter1_code, view.compose_type, view.exporter2_code);
    for p in &view.data {
        println!("  {}  {}", p.moment.date_naive(), p.value.round_dp(2));
    }

    // Division by zero yields zero instead of failing the whole series.
    let view = fs
        .compose("USD_RUB", ComposeType::Divide, "Zero", from, to, HistoryQuery::new())
        .await?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
