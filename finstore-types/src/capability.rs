use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for factory roles, errors, and telemetry.
///
/// Each label maps to one optional role an exporter factory may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Download history values for an instrument.
    History,
    /// List the instruments a source offers.
    Instruments,
    /// Probe whether the remote API still answers as expected.
    ApiActuality,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Instruments => "instruments",
            Self::ApiActuality => "api-actuality",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
