//! Benchmark configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! scenario_dir = "scenarios"
//!
//! [runner]
//! concurrency = 4
//! expose_expected = false
//!
//! [runner.adapter_config]
//! policy = "strict"
//! ```

use crate::adapter::AdapterConfig;
use crate::error::BenchmarkError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default scenario directory, relative to the working directory
pub const DEFAULT_SCENARIO_DIR: &str = "scenarios";

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Maximum simultaneous scenario evaluations (1 = serial)
    pub concurrency: usize,
    /// Pass each scenario's expected outcome to `prepare`
    pub expose_expected: bool,
    /// Configuration handed to `prepare` for every scenario
    pub adapter_config: AdapterConfig,
}

impl RunnerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With concurrency limit
    #[inline]
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// With expected outcomes exposed to `prepare`
    #[inline]
    #[must_use]
    pub fn with_expose_expected(mut self, expose: bool) -> Self {
        self.expose_expected = expose;
        self
    }

    /// With adapter configuration
    #[inline]
    #[must_use]
    pub fn with_adapter_config(mut self, config: AdapterConfig) -> Self {
        self.adapter_config = config;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `BenchmarkError::Config` if `concurrency` is zero
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        if self.concurrency == 0 {
            return Err(BenchmarkError::Config(
                "runner.concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            expose_expected: false,
            adapter_config: AdapterConfig::new(),
        }
    }
}

/// Whole-benchmark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// Root of the scenario tree
    pub scenario_dir: PathBuf,
    /// Runner settings
    pub runner: RunnerConfig,
}

impl BenchmarkConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - `BenchmarkError::Toml` on syntax errors or unknown keys
    /// - `BenchmarkError::Config` on out-of-range values
    pub fn from_toml_str(content: &str) -> Result<Self, BenchmarkError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `BenchmarkError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchmarkError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|err| BenchmarkError::io_error(path, err))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded benchmark configuration");
        Ok(config)
    }

    /// Validate all sections
    ///
    /// # Errors
    /// Returns the first invalid value found
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        self.runner.validate()
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            scenario_dir: PathBuf::from(DEFAULT_SCENARIO_DIR),
            runner: RunnerConfig::default(),
        }
    }
}
