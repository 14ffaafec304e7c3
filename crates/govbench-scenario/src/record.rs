//! Strict parsing of scenario records
//!
//! One record per file. Records must match the [`Scenario`] schema exactly:
//! unknown fields, unknown enum values and non-object inputs are rejected
//! here, never at scoring time.

use crate::error::RecordError;
use crate::types::Scenario;
use std::path::Path;

/// On-disk encoding of a scenario record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    Json,
    Yaml,
}

impl RecordFormat {
    /// Supported file extensions (without dot)
    pub const EXTENSIONS: [&'static str; 3] = ["json", "yaml", "yml"];

    /// Select a format from a file extension, ignoring ASCII case
    ///
    /// # Errors
    /// Returns `RecordError::UnsupportedExtension` for anything but
    /// `json`, `yaml` or `yml`.
    pub fn from_extension(ext: &str) -> Result<Self, RecordError> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(RecordError::UnsupportedExtension(other.to_string())),
        }
    }

    /// Select a format from a path's extension
    ///
    /// # Errors
    /// See [`RecordFormat::from_extension`].
    pub fn from_path(path: &Path) -> Result<Self, RecordError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    /// Check if a path carries a supported record extension
    #[must_use]
    pub fn is_record(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Parse and validate one scenario record
///
/// # Errors
/// - `RecordError::Json` / `RecordError::Yaml` on syntax or schema mismatch
/// - `RecordError::Invalid` if the record has an empty id
pub fn parse_record(content: &str, format: RecordFormat) -> Result<Scenario, RecordError> {
    let scenario: Scenario = match format {
        RecordFormat::Json => serde_json::from_str(content)?,
        RecordFormat::Yaml => serde_yaml::from_str(content)?,
    };

    if scenario.id.trim().is_empty() {
        return Err(RecordError::Invalid("scenario id must not be empty".to_string()));
    }

    Ok(scenario)
}
