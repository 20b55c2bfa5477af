use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the finstore workspace.
///
/// This wraps capability mismatches, argument validation errors, exporter-tagged
/// failures, storage failures and not-found conditions.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FinStoreError {
    /// The requested capability is not implemented by the exporter factory.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "history").
        capability: String,
    },

    /// Issues with the returned or expected data (malformed values, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual exporter returned an error.
    #[error("{exporter} failed: {msg}")]
    Exporter {
        /// Exporter type or unique code that failed.
        exporter: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The record store rejected or failed an operation.
    #[error("store error: {0}")]
    Store(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "exporter MSCI_World".
        what: String,
    },

    /// An exporter with the same unique code already exists.
    #[error("duplicate exporter code: {code}")]
    DuplicateCode {
        /// The conflicting unique code.
        code: String,
    },

    /// The exporter is inactive or its type is not registered.
    #[error("exporter disabled: {code}")]
    ExporterDisabled {
        /// Unique code of the disabled exporter.
        code: String,
    },

    /// An individual exporter call exceeded the configured timeout.
    #[error("download timed out: {capability} via {exporter}")]
    DownloadTimeout {
        /// Exporter type that timed out.
        exporter: String,
        /// Capability label (e.g. "history", "instruments", "api-actuality").
        capability: String,
    },
}

impl FinStoreError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build an `Exporter` error with the exporter name and message.
    pub fn exporter(exporter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Exporter {
            exporter: exporter.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `DownloadTimeout` error.
    pub fn download_timeout(exporter: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::DownloadTimeout {
            exporter: exporter.into(),
            capability: capability.into(),
        }
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// Non-actionable errors are those indicating capability absence or a benign
    /// not-found condition.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self, Self::Unsupported { .. } | Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for FinStoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}
