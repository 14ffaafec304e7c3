//! Error types for scenario records

use std::path::PathBuf;

/// A string did not name a known variant of a closed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    /// Enumeration name (`category`, `difficulty`, `severity`)
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Errors while reading or validating a single scenario record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// File extension is not a supported record format
    #[error("unsupported record extension: '{0}'")]
    UnsupportedExtension(String),

    /// JSON syntax or schema error
    #[error("invalid JSON record: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML syntax or schema error
    #[error("invalid YAML record: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Record parsed but violates a field constraint
    #[error("invalid record: {0}")]
    Invalid(String),

    /// IO error reading the record
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RecordError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
