//! Report errors

/// Errors rendering a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Unrecognised format name
    #[error("unknown report format: '{0}' (expected summary, markdown or json)")]
    UnknownFormat(String),

    /// JSON serialization failed
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
