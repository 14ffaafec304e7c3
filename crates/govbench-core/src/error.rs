//! Error types for the benchmark orchestrator
//!
//! Covers the three places a run can go wrong outside the scorer:
//! - adapter lifecycle calls (recovered into a failing verdict)
//! - catalog loading (bad records are skipped, only the root can fail)
//! - configuration

use std::path::PathBuf;

/// Failure reported by a governance adapter
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Per-scenario preparation failed
    #[error("prepare failed: {0}")]
    Prepare(String),

    /// The decision itself failed
    #[error("decide failed: {0}")]
    Decide(String),

    /// Cleanup after a scenario failed
    #[error("release failed: {0}")]
    Release(String),

    /// Adapter panicked inside a lifecycle call
    #[error("adapter panicked during {phase}")]
    Panicked { phase: &'static str },

    /// Any other adapter-specific failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdapterError {
    /// Create decide error
    #[inline]
    pub fn decide(message: impl Into<String>) -> Self {
        Self::Decide(message.into())
    }

    /// Create prepare error
    #[inline]
    pub fn prepare(message: impl Into<String>) -> Self {
        Self::Prepare(message.into())
    }
}

/// Errors loading a scenario catalog
///
/// Only the catalog root can fail a load; individual records and category
/// directories are skipped and listed in the catalog instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// IO error on the catalog root
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path exists but is not a directory
    #[error("scenario root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Top-level benchmark error
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Catalog could not be loaded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// IO error outside the catalog
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BenchmarkError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
