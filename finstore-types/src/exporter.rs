//! Exporter metadata types usable across crates.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned identity of an exporter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExporterId(pub u64);

impl fmt::Display for ExporterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable string identifier of an exporter factory.
///
/// Persisted with every exporter record and resolved through the registry
/// populated at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExporterType(String);

impl ExporterType {
    /// Construct a typed identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExporterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExporterType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A configured connector to one external source/instrument, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterRecord {
    /// Storage identity.
    pub id: ExporterId,
    /// Human-facing unique code (e.g. `MSCI_World_NET_USD`).
    pub unique_code: String,
    /// Free-form description.
    pub description: String,
    /// Inactive exporters keep their history but are never downloaded.
    pub is_active: bool,
    /// Identifier of the factory that knows how to talk to the source.
    pub exporter_type: ExporterType,
    /// Parameters used to list available instruments.
    pub download_info_parameters: serde_json::Value,
    /// Parameters used to download history values.
    pub download_history_parameters: serde_json::Value,
}

/// Attributes of an exporter that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExporter {
    /// Human-facing unique code.
    pub unique_code: String,
    /// Free-form description.
    pub description: String,
    /// Whether the exporter takes part in downloads.
    pub is_active: bool,
    /// Identifier of the factory.
    pub exporter_type: ExporterType,
    /// Parameters used to list available instruments.
    pub download_info_parameters: serde_json::Value,
    /// Parameters used to download history values.
    pub download_history_parameters: serde_json::Value,
}

impl NewExporter {
    /// Attach a storage identity, producing the persisted record.
    #[must_use]
    pub fn with_id(self, id: ExporterId) -> ExporterRecord {
        ExporterRecord {
            id,
            unique_code: self.unique_code,
            description: self.description,
            is_active: self.is_active,
            exporter_type: self.exporter_type,
            download_info_parameters: self.download_info_parameters,
            download_history_parameters: self.download_history_parameters,
        }
    }
}

/// One instrument a source can export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentInfo {
    /// Source-specific instrument code.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Outcome of the last remote API probe for an exporter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceApiActuality {
    /// Exporter type that was checked.
    pub exporter_type: ExporterType,
    /// Error text of the last failed check; `None` when it succeeded.
    pub check_error_message: Option<String>,
    /// When the check ran.
    pub last_check_moment: DateTime<Utc>,
}
