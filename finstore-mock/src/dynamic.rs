use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tokio::sync::Mutex;

use finstore_core::exporter::{
    ApiActualityChecker, ExporterFactory, HistoryExporter, InstrumentsInfoExporter,
};
use finstore_core::{FinStoreError, InstrumentInfo, TimeSeriesPoint};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(FinStoreError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

impl<T> MockBehavior<T> {
    async fn resolve(self, capability: &str) -> Result<T, FinStoreError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Fail(e) => Err(e),
            Self::Hang => {
                std::future::pending::<()>().await;
                Err(FinStoreError::unsupported(capability))
            }
        }
    }
}

/// One recorded `export_history` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequestLog {
    /// Value of the `code` history parameter, or the raw JSON when absent.
    pub code: String,
    /// Requested window start.
    pub moment_from: DateTime<FixedOffset>,
    /// Requested window end.
    pub moment_to: DateTime<FixedOffset>,
}

#[derive(Default)]
struct InternalState {
    history_rules: HashMap<String, MockBehavior<Vec<TimeSeriesPoint>>>,
    instruments_rule: Option<MockBehavior<Vec<InstrumentInfo>>>,
    api_rule: Option<MockBehavior<()>>,
    history_requests: Vec<HistoryRequestLog>,
}

fn code_of(parameters: &serde_json::Value) -> String {
    parameters
        .get("code")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| parameters.to_string(), str::to_string)
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `export_history` calls for a specific instrument code.
    pub async fn set_history_behavior(
        &self,
        code: impl Into<String>,
        behavior: MockBehavior<Vec<TimeSeriesPoint>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.history_rules.insert(code.into(), behavior);
    }

    /// Set the behavior for `export_instruments` calls.
    pub async fn set_instruments_behavior(&self, behavior: MockBehavior<Vec<InstrumentInfo>>) {
        let mut guard = self.state.lock().await;
        guard.instruments_rule = Some(behavior);
    }

    /// Set the behavior for API probes.
    pub async fn set_api_behavior(&self, behavior: MockBehavior<()>) {
        let mut guard = self.state.lock().await;
        guard.api_rule = Some(behavior);
    }

    /// Return a copy of the history request log.
    pub async fn history_requests(&self) -> Vec<HistoryRequestLog> {
        let guard = self.state.lock().await;
        guard.history_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.history_rules.clear();
        guard.instruments_rule = None;
        guard.api_rule = None;
        guard.history_requests.clear();
    }
}

/// An exporter factory that defers all behavior to an external controller.
///
/// Without a configured rule, history and instrument calls report the
/// capability as unsupported while API probes succeed.
pub struct DynamicMockExporter {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockExporter {
    /// Create a new dynamic mock exporter and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn ExporterFactory>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn ExporterFactory>, controller)
    }
}

impl ExporterFactory for DynamicMockExporter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_history_exporter(&self) -> Option<&dyn HistoryExporter> {
        Some(self as &dyn HistoryExporter)
    }

    fn as_instruments_info_exporter(&self) -> Option<&dyn InstrumentsInfoExporter> {
        Some(self as &dyn InstrumentsInfoExporter)
    }

    fn as_api_actuality_checker(&self) -> Option<&dyn ApiActualityChecker> {
        Some(self as &dyn ApiActualityChecker)
    }
}

#[async_trait]
impl HistoryExporter for DynamicMockExporter {
    async fn export_history(
        &self,
        parameters: &serde_json::Value,
        moment_from: DateTime<FixedOffset>,
        moment_to: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeSeriesPoint>, FinStoreError> {
        let code = code_of(parameters);
        // Log and snapshot without holding the lock across the behavior await
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.history_requests.push(HistoryRequestLog {
                code: code.clone(),
                moment_from,
                moment_to,
            });
            guard.history_rules.get(&code).cloned()
        };
        match behavior {
            Some(b) => b.resolve("history").await,
            None => Err(FinStoreError::unsupported("history")),
        }
    }
}

#[async_trait]
impl InstrumentsInfoExporter for DynamicMockExporter {
    async fn export_instruments(
        &self,
        _parameters: &serde_json::Value,
    ) -> Result<Vec<InstrumentInfo>, FinStoreError> {
        let behavior = {
            let guard = self.state.lock().await;
            guard.instruments_rule.clone()
        };
        match behavior {
            Some(b) => b.resolve("instruments").await,
            None => Err(FinStoreError::unsupported("instruments")),
        }
    }
}

#[async_trait]
impl ApiActualityChecker for DynamicMockExporter {
    async fn check(&self) -> Result<(), FinStoreError> {
        let behavior = {
            let guard = self.state.lock().await;
            guard.api_rule.clone()
        };
        match behavior {
            Some(b) => b.resolve("api-actuality").await,
            None => Ok(()),
        }
    }
}
