//! Governance benchmark orchestrator
//!
//! Runs a catalog of scenarios against a pluggable governance adapter:
//! - Loads the scenario catalog from a per-category directory tree
//! - Drives each scenario through the adapter's prepare/decide/release lifecycle
//! - Scores every decision and rolls verdicts up per category and overall
//! - Returns a self-describing result envelope
//!
//! # Example
//!
//! ```rust,ignore
//! use govbench_core::{BenchmarkRunner, RunnerConfig, ScenarioCatalog};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ScenarioCatalog::load("scenarios").await?;
//! let runner = BenchmarkRunner::new(Arc::new(MyAdapter::new()), Arc::new(catalog))
//!     .with_config(RunnerConfig::new().with_concurrency(4));
//!
//! let result = runner.run(None).await;
//! println!("{}/{} passed", result.aggregate.total_passed(), result.aggregate.total_scenarios());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod adapter;
pub mod catalog;
pub mod config;
pub mod error;
pub mod result;
pub mod runner;

pub use adapter::{AdapterConfig, GovernanceAdapter};
pub use catalog::{ScenarioCatalog, SkippedRecord};
pub use config::{BenchmarkConfig, RunnerConfig, DEFAULT_SCENARIO_DIR};
pub use error::{AdapterError, BenchmarkError, CatalogError};
pub use result::{BenchmarkResult, ExecutionError, RunId, NO_SCENARIOS_FOUND};
pub use runner::BenchmarkRunner;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing adapters and running benchmarks
    pub use crate::{
        AdapterConfig, AdapterError, BenchmarkResult, BenchmarkRunner, GovernanceAdapter,
        RunnerConfig, ScenarioCatalog,
    };
    pub use govbench_scenario::{
        Category, Difficulty, GovernanceResponse, Scenario, ScenarioExpected, ScenarioInput,
        Severity,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
