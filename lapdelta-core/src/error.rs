//! Load error taxonomy
//!
//! Every data-load path terminates in data or one of these classified
//! errors; nothing panics. The loader uses [`LoadError::is_recoverable`] to
//! decide whether a failure triggers the fallback chain or surfaces to the
//! presentation layer as-is.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// A data endpoint could not be reached or answered with a non-success
    /// status. Triggers the fallback chain.
    #[error("fetch failed: {detail}")]
    Fetch { status: Option<u16>, detail: String },

    /// The response body was not decodable into the expected schema. Treated
    /// exactly like a fetch failure by the loader policy.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Duplicate or empty driver choice, or a selection step taken out of
    /// order. Rejected before any fetch.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Every record in the payload was filtered out. Terminal for the load.
    #[error("no valid records in {what}")]
    NoValidRecords { what: String },

    /// Telemetry requested from a source that cannot provide it. There is no
    /// bundled or synthetic telemetry.
    #[error("telemetry is only available from the live API")]
    TelemetryUnavailable,

    /// No bundled document exists for the requested key.
    #[error("no bundled data for {what}")]
    MissingResource { what: String },
}

impl LoadError {
    pub fn fetch(status: Option<u16>, detail: impl Into<String>) -> Self {
        LoadError::Fetch {
            status,
            detail: detail.into(),
        }
    }

    /// Whether the loader may answer this failure from the next source in
    /// the chain instead of surfacing it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoadError::Fetch { .. } | LoadError::Malformed(_) | LoadError::MissingResource { .. }
        )
    }

    /// HTTP status of a fetch failure, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}
