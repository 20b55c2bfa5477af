use std::sync::Arc;

use finstore::{ExporterType, FinStore, NewExporter};
use finstore_mock::{MOCK_EXPORTER_TYPE, MemoryStore, MockExporter};

/// Install a formatting subscriber honouring `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Orchestrator over an in-memory store with the fixture exporter registered.
pub fn fin_store() -> Result<FinStore, finstore::FinStoreError> {
    FinStore::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_factory(Arc::new(MockExporter::new()))
        .timezone(chrono_tz::Europe::Moscow)
        .build()
}

/// Fixture-backed exporter for `instrument`.
pub fn exporter(code: &str, instrument: &str) -> NewExporter {
    NewExporter {
        unique_code: code.to_string(),
        description: format!("{instrument} from fixtures"),
        is_active: true,
        exporter_type: ExporterType::from(MOCK_EXPORTER_TYPE),
        download_info_parameters: serde_json::Value::Null,
        download_history_parameters: serde_json::json!({ "code": instrument }),
    }
}
